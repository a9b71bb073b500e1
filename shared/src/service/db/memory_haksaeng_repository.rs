//! 메모리 학생 저장소
//!
//! 테스트와 개발 모드에서 사용합니다. 저장소와 같은 조건을 유지하기 위해
//! 행을 CP949 바이트로 보관하고, 이름 검색은 복원한 문자 단위 LIKE로 비교합니다.

use crate::model::{Haksaeng, HaksaengFields, HaksaengQuery, HaksaengStats, HaksaengUpdate};
use crate::service::db::haksaeng_repository::{EncodedFields, HaksaengRepository};
use crate::tool::cp949;
use crate::tool::current_time::CurrentTime;
use crate::tool::error::AppError;
use crate::tool::get_id::next_haksaeng_id;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// 저장된 행 (PIC 컬럼 없음)
#[derive(Debug, Clone)]
struct StoredRow {
    id: String,
    encoded: EncodedFields,
    registered_at: Option<NaiveDateTime>,
}

impl StoredRow {
    fn to_haksaeng(&self) -> Result<Haksaeng, AppError> {
        Ok(Haksaeng {
            id: self.id.clone(),
            fields: self.encoded.decode()?,
            registered_at: self.registered_at,
        })
    }
}

/// 메모리 기반 학생 저장소
#[derive(Default)]
pub struct MemoryHaksaengRepository {
    rows: RwLock<BTreeMap<String, StoredRow>>,
}

impl MemoryHaksaengRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 저장된 행 수
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}

/// SQL `LIKE` 비교를 문자 단위로 수행합니다.
///
/// `%`는 임의 길이, `_`는 정확히 한 문자와 일치하고 `\`는 다음 문자를 문자 그대로 비교합니다.
pub fn like_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    let (mut p, mut t) = (0, 0);
    // 마지막 `%` 위치와 그때의 text 위치
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if let Some(&c) = pattern.get(p) {
            match c {
                '%' => {
                    backtrack = Some((p, t));
                    p += 1;
                    continue;
                }
                '_' => {
                    p += 1;
                    t += 1;
                    continue;
                }
                '\\' if p + 1 < pattern.len() => {
                    if pattern[p + 1] == text[t] {
                        p += 2;
                        t += 1;
                        continue;
                    }
                }
                _ => {
                    if c == text[t] {
                        p += 1;
                        t += 1;
                        continue;
                    }
                }
            }
        }

        match backtrack {
            Some((star_p, star_t)) => {
                p = star_p + 1;
                t = star_t + 1;
                backtrack = Some((star_p, star_t + 1));
            }
            None => return false,
        }
    }

    pattern[p.min(pattern.len())..].iter().all(|&c| c == '%')
}

#[async_trait]
impl HaksaengRepository for MemoryHaksaengRepository {
    async fn list(&self, query: &HaksaengQuery) -> Result<Vec<Haksaeng>, AppError> {
        // 저장소와 같은 조건으로 표현 불가 문자를 거른 뒤, 복원한 문자열로 비교
        let pattern = match query.name_filter.as_deref() {
            Some(filter) => Some(cp949::decode(&cp949::like_pattern(filter)?)?),
            None => None,
        };

        let rows = self.rows.read();
        let mut matched: Vec<&StoredRow> = Vec::with_capacity(rows.len());
        for row in rows.values() {
            let is_match = match &pattern {
                Some(pattern) => like_match(pattern, &cp949::decode(&row.encoded.name)?),
                None => true,
            };
            if is_match {
                matched.push(row);
            }
        }

        // NULL 코드가 먼저 오는 오름차순
        matched.sort_by(|a, b| {
            (&a.encoded.level_code, &a.encoded.grade_code, &a.encoded.name).cmp(&(
                &b.encoded.level_code,
                &b.encoded.grade_code,
                &b.encoded.name,
            ))
        });

        let offset = usize::try_from(query.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);

        matched
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(StoredRow::to_haksaeng)
            .collect()
    }

    async fn stats(&self) -> Result<HaksaengStats, AppError> {
        let rows = self.rows.read();
        let mut stats = HaksaengStats {
            total: rows.len() as i64,
            ..Default::default()
        };

        for row in rows.values() {
            let level = cp949::decode_opt(row.encoded.level_code.as_deref())?;
            stats.add_level(level.as_deref(), 1);
        }

        Ok(stats)
    }

    async fn find(&self, id: &str) -> Result<Haksaeng, AppError> {
        self.rows
            .read()
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("학생 ID {id}")))?
            .to_haksaeng()
    }

    async fn insert(&self, id: &str, fields: &HaksaengFields) -> Result<Haksaeng, AppError> {
        let encoded = EncodedFields::encode(fields)?;
        let registered_at = CurrentTime::new().registered_at();

        let mut rows = self.rows.write();
        if rows.contains_key(id) {
            return Err(AppError::DuplicateEntry(format!("학생 ID {id}")));
        }

        rows.insert(
            id.to_string(),
            StoredRow {
                id: id.to_string(),
                encoded,
                registered_at: Some(registered_at),
            },
        );
        info!("학생 등록 완료: {}", id);

        Ok(Haksaeng {
            id: id.to_string(),
            fields: fields.clone(),
            registered_at: Some(registered_at),
        })
    }

    async fn next_id(&self, year: i32) -> Result<String, AppError> {
        let prefix = year.to_string();
        let rows = self.rows.read();
        let max_id = rows.keys().filter(|id| id.starts_with(&prefix)).max();

        debug!("연도 {} 최대 학생 ID: {:?}", year, max_id);
        Ok(next_haksaeng_id(year, max_id.map(String::as_str)))
    }

    async fn update(&self, id: &str, patch: &HaksaengUpdate) -> Result<Haksaeng, AppError> {
        let mut rows = self.rows.write();
        let row = rows
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("학생 ID {id}")))?;

        let fields = patch.merge_into(&row.encoded.decode()?);
        row.encoded = EncodedFields::encode(&fields)?;
        info!("학생 정보 수정 완료: {}", id);

        Ok(Haksaeng {
            id: row.id.clone(),
            fields,
            registered_at: row.registered_at,
        })
    }

    async fn delete(&self, id: &str) -> Result<Haksaeng, AppError> {
        let row = self
            .rows
            .write()
            .remove(id)
            .ok_or_else(|| AppError::NotFound(format!("학생 ID {id}")))?;

        info!("학생 삭제 완료: {}", id);
        row.to_haksaeng()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str, level: Option<&str>, grade: Option<&str>) -> HaksaengFields {
        HaksaengFields {
            name: name.to_string(),
            level_code: level.map(str::to_string),
            grade_code: grade.map(str::to_string),
            ..Default::default()
        }
    }

    async fn names_matching(repo: &MemoryHaksaengRepository, filter: &str) -> Vec<String> {
        repo.list(&HaksaengQuery::new(0, 100, Some(filter.to_string())))
            .await
            .unwrap()
            .into_iter()
            .map(|h| h.fields.name)
            .collect()
    }

    fn all() -> HaksaengQuery {
        HaksaengQuery::new(0, 100, None)
    }

    #[test]
    fn test_like_match_wildcards() {
        assert!(like_match("%abc%", "xxabcxx"));
        assert!(like_match("%abc%", "abc"));
        assert!(!like_match("%abc%", "abxc"));
        assert!(like_match("a_c", "abc"));
        assert!(!like_match("a_c", "ac"));
        assert!(like_match("%", ""));
        assert!(like_match("%a%b%", "xaxxbx"));
        assert!(like_match("100\\%", "100%"));
        assert!(!like_match("100\\%", "1000"));
    }

    #[test]
    fn test_like_match_is_character_level() {
        // "똠"의 CP949 후행 바이트는 ASCII 'c'와 같지만 문자로는 일치하지 않음
        assert!(!like_match("%c%", "똠방"));
        // `_`는 한글 한 글자와 일치
        assert!(like_match("%홍_동%", "홍길동"));
        // "가나" 바이트 중간의 A1 B3("〕")은 문자 경계를 넘으므로 불일치
        assert!(!like_match("%〕%", "가나"));
    }

    #[tokio::test]
    async fn test_list_name_filter_respects_character_boundaries() {
        let repo = MemoryHaksaengRepository::new();
        repo.insert("20240001", &fields("똠방", None, None)).await.unwrap();
        repo.insert("20240002", &fields("홍길동", None, None)).await.unwrap();
        repo.insert("20240003", &fields("가나", None, None)).await.unwrap();

        assert!(names_matching(&repo, "c").await.is_empty());
        assert_eq!(names_matching(&repo, "홍_동").await, vec!["홍길동"]);
        assert!(names_matching(&repo, "〕").await.is_empty());
        assert_eq!(names_matching(&repo, "방").await, vec!["똠방"]);
    }

    #[tokio::test]
    async fn test_list_orders_by_level_grade_name() {
        let repo = MemoryHaksaengRepository::new();
        repo.insert("20240001", &fields("하늘", Some("2"), Some("1"))).await.unwrap();
        repo.insert("20240002", &fields("가람", Some("2"), Some("1"))).await.unwrap();
        repo.insert("20240003", &fields("나래", Some("1"), Some("3"))).await.unwrap();
        repo.insert("20240004", &fields("다솜", None, None)).await.unwrap();

        let names: Vec<String> = repo
            .list(&all())
            .await
            .unwrap()
            .into_iter()
            .map(|h| h.fields.name)
            .collect();
        assert_eq!(names, vec!["다솜", "나래", "가람", "하늘"]);
    }

    #[tokio::test]
    async fn test_list_name_filter_and_paging() {
        let repo = MemoryHaksaengRepository::new();
        repo.insert("20240001", &fields("홍길동", Some("1"), Some("1"))).await.unwrap();
        repo.insert("20240002", &fields("김길순", Some("1"), Some("2"))).await.unwrap();
        repo.insert("20240003", &fields("이영희", Some("1"), Some("3"))).await.unwrap();

        let found = repo
            .list(&HaksaengQuery::new(0, 100, Some("길".to_string())))
            .await
            .unwrap();
        assert_eq!(found.len(), 2);

        let page = repo.list(&HaksaengQuery::new(1, 1, None)).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, "20240002");
    }

    #[tokio::test]
    async fn test_inserted_fields_are_listed_unchanged() {
        let repo = MemoryHaksaengRepository::new();
        let input = HaksaengFields {
            name: "홍길동".to_string(),
            gender_code: Some("M".to_string()),
            school_name: Some("한빛고등학교".to_string()),
            level_code: Some("3".to_string()),
            grade_code: Some("2".to_string()),
            phone: Some("010-1234-5678".to_string()),
            address1: Some("서울특별시 종로구 세종대로 1".to_string()),
            address2: Some("101동 202호".to_string()),
        };
        let created = repo.insert("20240001", &input).await.unwrap();

        let listed = repo.list(&all()).await.unwrap();
        assert_eq!(listed, vec![created]);
        assert_eq!(listed[0].fields, input);
    }

    #[tokio::test]
    async fn test_stats_buckets() {
        let repo = MemoryHaksaengRepository::new();
        let levels = [Some("1"), Some("1"), Some("2"), Some("3"), Some("4"), None];
        for (i, level) in levels.iter().enumerate() {
            let id = format!("2024000{}", i + 1);
            repo.insert(&id, &fields("학생", *level, None)).await.unwrap();
        }

        let stats = repo.stats().await.unwrap();
        assert_eq!(
            stats,
            HaksaengStats {
                total: 6,
                elementary: 2,
                middle: 1,
                high: 1,
                general: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_next_id_is_pure_and_increments() {
        let repo = MemoryHaksaengRepository::new();
        assert_eq!(repo.next_id(2024).await.unwrap(), "20240001");

        repo.insert("20240041", &fields("학생", None, None)).await.unwrap();
        repo.insert("20230099", &fields("학생", None, None)).await.unwrap();

        assert_eq!(repo.next_id(2024).await.unwrap(), "20240042");
        assert_eq!(repo.next_id(2024).await.unwrap(), "20240042");
    }

    #[tokio::test]
    async fn test_colliding_inserts_one_wins() {
        let repo = MemoryHaksaengRepository::new();
        let first = repo.next_id(2024).await.unwrap();
        let second = repo.next_id(2024).await.unwrap();
        assert_eq!(first, second);

        let gap = fields("갑", None, None);
        let eul = fields("을", None, None);
        let (a, b) = tokio::join!(repo.insert(&first, &gap), repo.insert(&second, &eul));
        let results = [a, b];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(AppError::DuplicateEntry(_)))));
    }

    #[tokio::test]
    async fn test_update_missing_writes_nothing() {
        let repo = MemoryHaksaengRepository::new();
        let result = repo.update("20249999", &HaksaengUpdate::default()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_update_keeps_id_and_registered_at() {
        let repo = MemoryHaksaengRepository::new();
        let created = repo
            .insert("20240001", &fields("홍길동", Some("1"), Some("1")))
            .await
            .unwrap();

        let patch = HaksaengUpdate {
            grade_code: Some("2".to_string()),
            ..Default::default()
        };
        let updated = repo.update("20240001", &patch).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.registered_at, created.registered_at);
        assert_eq!(updated.fields.name, "홍길동");
        assert_eq!(updated.fields.grade_code.as_deref(), Some("2"));
        assert_eq!(repo.find("20240001").await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_with_unmappable_text_keeps_row() {
        let repo = MemoryHaksaengRepository::new();
        let created = repo
            .insert("20240001", &fields("홍길동", None, None))
            .await
            .unwrap();

        let patch = HaksaengUpdate {
            address1: Some("🏫".to_string()),
            ..Default::default()
        };
        let result = repo.update("20240001", &patch).await;

        assert!(matches!(result, Err(AppError::Encoding(_))));
        assert_eq!(repo.find("20240001").await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_delete_returns_snapshot() {
        let repo = MemoryHaksaengRepository::new();
        let created = repo
            .insert("20240001", &fields("홍길동", None, None))
            .await
            .unwrap();

        assert_eq!(repo.delete("20240001").await.unwrap(), created);
        assert!(matches!(
            repo.delete("20240001").await,
            Err(AppError::NotFound(_))
        ));
    }
}
