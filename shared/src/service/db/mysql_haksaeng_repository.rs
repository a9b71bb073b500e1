//! MySQL 학생 저장소
//!
//! 드라이버의 문자셋 변환을 거치지 않도록 텍스트는 바이트로 바인딩하고,
//! 읽을 때도 `CAST(... AS BINARY)`로 바이트를 받아 CP949로 복원합니다.
//! 이름 검색 패턴도 바이트로 보내고, 서버에서 컬럼 문자셋으로 바꿔 문자 단위로 비교합니다.

use crate::model::{Haksaeng, HaksaengFields, HaksaengQuery, HaksaengStats, HaksaengUpdate};
use crate::service::db::haksaeng_repository::{EncodedFields, HaksaengRepository};
use crate::tool::cp949;
use crate::tool::current_time::CurrentTime;
use crate::tool::error::AppError;
use crate::tool::get_id::{next_haksaeng_id, year_prefix_pattern};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::mysql::{MySqlArguments, MySqlConnection, MySqlPool, MySqlRow};
use sqlx::pool::PoolConnection;
use sqlx::query::Query;
use sqlx::{MySql, Row};
use tracing::{debug, info, warn};

// PIC 컬럼은 어떤 쿼리에도 포함하지 않음
const SELECT_COLUMNS: &str = "HAKSAENG_ID, \
    CAST(HAKSAENG_NM AS BINARY) AS HAKSAENG_NM, \
    CAST(GENDER_CD AS BINARY) AS GENDER_CD, \
    CAST(HAKGYOMYEONG AS BINARY) AS HAKGYOMYEONG, \
    CAST(CHOJUNGGO_CD AS BINARY) AS CHOJUNGGO_CD, \
    CAST(HAKNYEON AS BINARY) AS HAKNYEON, \
    CAST(HP_NO AS BINARY) AS HP_NO, \
    CAST(ADDR1 AS BINARY) AS ADDR1, \
    CAST(ADDR2 AS BINARY) AS ADDR2, \
    DUNGROK_DT";

const SELECT_ALL_SQL: &str = "SELECT {columns} FROM HJ_HAKSAENG";

const SELECT_BY_ID_SQL: &str = "SELECT {columns} FROM HJ_HAKSAENG WHERE HAKSAENG_ID = ?";

// 패턴은 바이트로 보내되 컬럼 문자셋으로 해석해서 문자 단위로 비교
const NAME_FILTER_SQL: &str = " WHERE HAKSAENG_NM LIKE CAST(? AS CHAR CHARACTER SET euckr)";

const ORDER_PAGE_SQL: &str = " ORDER BY CHOJUNGGO_CD ASC, HAKNYEON ASC, CAST(HAKSAENG_NM AS BINARY) ASC \
    LIMIT ? OFFSET ?";

const COUNT_SQL: &str = "SELECT COUNT(HAKSAENG_ID) FROM HJ_HAKSAENG";

const COUNT_BY_LEVEL_SQL: &str = "SELECT CAST(CHOJUNGGO_CD AS BINARY) AS CHOJUNGGO_CD, COUNT(HAKSAENG_ID) AS CNT \
    FROM HJ_HAKSAENG GROUP BY CHOJUNGGO_CD";

const MAX_ID_SQL: &str = "SELECT MAX(HAKSAENG_ID) FROM HJ_HAKSAENG WHERE HAKSAENG_ID LIKE ?";

const INSERT_SQL: &str = "INSERT INTO HJ_HAKSAENG \
    (HAKSAENG_NM, GENDER_CD, HAKGYOMYEONG, CHOJUNGGO_CD, HAKNYEON, HP_NO, ADDR1, ADDR2, HAKSAENG_ID, DUNGROK_DT) \
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

// ID와 등록일시는 SET 절에서 제외
const UPDATE_SQL: &str = "UPDATE HJ_HAKSAENG \
    SET HAKSAENG_NM = ?, GENDER_CD = ?, HAKGYOMYEONG = ?, CHOJUNGGO_CD = ?, \
        HAKNYEON = ?, HP_NO = ?, ADDR1 = ?, ADDR2 = ? \
    WHERE HAKSAENG_ID = ?";

const DELETE_SQL: &str = "DELETE FROM HJ_HAKSAENG WHERE HAKSAENG_ID = ?";

/// MySQL 기반 학생 저장소
#[derive(Clone)]
pub struct MySqlHaksaengRepository {
    pool: MySqlPool,
}

impl MySqlHaksaengRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// 요청 하나가 사용할 연결을 가져옵니다.
    ///
    /// 반환된 연결은 drop 시점에 풀로 돌아갑니다.
    async fn acquire(&self) -> Result<PoolConnection<MySql>, AppError> {
        self.pool.acquire().await.map_err(|e| {
            let err = AppError::from(e);
            err.log("학생 저장소 연결 획득");
            err
        })
    }
}

fn select_sql(template: &str) -> String {
    template.replace("{columns}", SELECT_COLUMNS)
}

/// 변경 가능한 8개 컬럼을 INSERT/UPDATE 공통 순서로 바인딩합니다.
fn bind_fields(
    query: Query<'_, MySql, MySqlArguments>,
    encoded: EncodedFields,
) -> Query<'_, MySql, MySqlArguments> {
    query
        .bind(encoded.name)
        .bind(encoded.gender_code)
        .bind(encoded.school_name)
        .bind(encoded.level_code)
        .bind(encoded.grade_code)
        .bind(encoded.phone)
        .bind(encoded.address1)
        .bind(encoded.address2)
}

fn row_to_haksaeng(row: &MySqlRow) -> Result<Haksaeng, AppError> {
    let id: String = row.try_get("HAKSAENG_ID")?;
    let encoded = EncodedFields {
        name: row
            .try_get::<Option<Vec<u8>>, _>("HAKSAENG_NM")?
            .unwrap_or_default(),
        gender_code: row.try_get("GENDER_CD")?,
        school_name: row.try_get("HAKGYOMYEONG")?,
        level_code: row.try_get("CHOJUNGGO_CD")?,
        grade_code: row.try_get("HAKNYEON")?,
        phone: row.try_get("HP_NO")?,
        address1: row.try_get("ADDR1")?,
        address2: row.try_get("ADDR2")?,
    };
    let registered_at: Option<NaiveDateTime> = row.try_get("DUNGROK_DT")?;

    Ok(Haksaeng {
        id: id.trim_end().to_string(),
        fields: encoded.decode()?,
        registered_at,
    })
}

async fn fetch_by_id(conn: &mut MySqlConnection, id: &str) -> Result<Option<Haksaeng>, AppError> {
    let row = sqlx::query(&select_sql(SELECT_BY_ID_SQL))
        .bind(id)
        .fetch_optional(conn)
        .await?;

    row.as_ref().map(row_to_haksaeng).transpose()
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("학생 ID {id}"))
}

#[async_trait]
impl HaksaengRepository for MySqlHaksaengRepository {
    async fn list(&self, query: &HaksaengQuery) -> Result<Vec<Haksaeng>, AppError> {
        let pattern = query
            .name_filter
            .as_deref()
            .map(cp949::like_pattern)
            .transpose()?;

        let mut sql = select_sql(SELECT_ALL_SQL);
        if pattern.is_some() {
            sql.push_str(NAME_FILTER_SQL);
        }
        sql.push_str(ORDER_PAGE_SQL);

        let mut statement = sqlx::query(&sql);
        if let Some(pattern) = pattern {
            statement = statement.bind(pattern);
        }

        let rows = statement
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(&self.pool)
            .await?;

        debug!(
            "학생 목록 조회: offset={}, limit={}, filter={:?}, rows={}",
            query.offset,
            query.limit,
            query.name_filter,
            rows.len()
        );

        rows.iter().map(row_to_haksaeng).collect()
    }

    async fn stats(&self) -> Result<HaksaengStats, AppError> {
        let mut conn = self.acquire().await?;

        let total: i64 = sqlx::query_scalar(COUNT_SQL)
            .fetch_one(&mut *conn)
            .await?;

        let levels: Vec<(Option<Vec<u8>>, i64)> = sqlx::query_as(COUNT_BY_LEVEL_SQL)
            .fetch_all(&mut *conn)
            .await?;

        let mut stats = HaksaengStats {
            total,
            ..Default::default()
        };
        for (level, count) in levels {
            let level = cp949::decode_opt(level.as_deref())?;
            stats.add_level(level.as_deref(), count);
        }

        Ok(stats)
    }

    async fn find(&self, id: &str) -> Result<Haksaeng, AppError> {
        let mut conn = self.acquire().await?;
        fetch_by_id(&mut conn, id).await?.ok_or_else(|| not_found(id))
    }

    async fn insert(&self, id: &str, fields: &HaksaengFields) -> Result<Haksaeng, AppError> {
        let encoded = EncodedFields::encode(fields)?;
        let registered_at = CurrentTime::new().registered_at();

        bind_fields(sqlx::query(INSERT_SQL), encoded)
            .bind(id)
            .bind(registered_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                let err = AppError::from(e);
                err.log("학생 등록");
                err
            })?;

        info!("학생 등록 완료: {}", id);

        Ok(Haksaeng {
            id: id.to_string(),
            fields: fields.clone(),
            registered_at: Some(registered_at),
        })
    }

    async fn next_id(&self, year: i32) -> Result<String, AppError> {
        let max_id: Option<String> = sqlx::query_scalar(MAX_ID_SQL)
            .bind(year_prefix_pattern(year))
            .fetch_one(&self.pool)
            .await?;

        Ok(next_haksaeng_id(year, max_id.as_deref()))
    }

    async fn update(&self, id: &str, patch: &HaksaengUpdate) -> Result<Haksaeng, AppError> {
        let mut conn = self.acquire().await?;

        let current = match fetch_by_id(&mut conn, id).await? {
            Some(current) => current,
            None => {
                warn!("수정 대상 학생 없음: {}", id);
                return Err(not_found(id));
            }
        };

        let fields = patch.merge_into(&current.fields);
        let encoded = EncodedFields::encode(&fields)?;

        bind_fields(sqlx::query(UPDATE_SQL), encoded)
            .bind(id)
            .execute(&mut *conn)
            .await?;

        info!("학생 정보 수정 완료: {}", id);

        Ok(Haksaeng {
            id: current.id,
            fields,
            registered_at: current.registered_at,
        })
    }

    async fn delete(&self, id: &str) -> Result<Haksaeng, AppError> {
        let mut conn = self.acquire().await?;

        let snapshot = match fetch_by_id(&mut conn, id).await? {
            Some(snapshot) => snapshot,
            None => {
                warn!("삭제 대상 학생 없음: {}", id);
                return Err(not_found(id));
            }
        };

        sqlx::query(DELETE_SQL).bind(id).execute(&mut *conn).await?;

        info!("학생 삭제 완료: {}", id);
        Ok(snapshot)
    }
}
