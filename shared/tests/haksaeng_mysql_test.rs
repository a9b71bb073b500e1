//! MySQL 학생 저장소 통합 테스트
//!
//! `TEST_DATABASE_URL`이 설정된 경우에만 실행됩니다. 테스트 DB의 HJ_HAKSAENG 테이블을 다시 만듭니다.

use shared::model::{HaksaengFields, HaksaengQuery, HaksaengUpdate};
use shared::service::db::{HaksaengRepository, MySqlHaksaengRepository};
use shared::tool::error::AppError;
use sqlx::mysql::MySqlPool;

/// 테스트 DB 연결, 설정이 없으면 `None`
async fn setup_test_db() -> Option<MySqlPool> {
    let database_url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            println!("TEST_DATABASE_URL이 없어 MySQL 통합 테스트를 건너뜁니다.");
            return None;
        }
    };

    let pool = MySqlPool::connect(&database_url)
        .await
        .expect("Failed to connect to test database");
    Some(pool)
}

/// 테스트 테이블 생성
async fn setup_test_table(pool: &MySqlPool) {
    sqlx::query("DROP TABLE IF EXISTS HJ_HAKSAENG")
        .execute(pool)
        .await
        .ok();

    sqlx::query(
        r#"
        CREATE TABLE HJ_HAKSAENG (
            HAKSAENG_ID CHAR(8) NOT NULL PRIMARY KEY,
            HAKSAENG_NM VARCHAR(20) NOT NULL,
            GENDER_CD VARCHAR(1) NULL,
            HAKGYOMYEONG VARCHAR(30) NULL,
            CHOJUNGGO_CD VARCHAR(1) NULL,
            HAKNYEON VARCHAR(1) NULL,
            HP_NO VARCHAR(16) NULL,
            ADDR1 VARCHAR(60) NULL,
            ADDR2 VARCHAR(30) NULL,
            DUNGROK_DT DATETIME NULL,
            PIC LONGBLOB NULL
        ) DEFAULT CHARSET = euckr
        "#,
    )
    .execute(pool)
    .await
    .expect("Failed to create HJ_HAKSAENG table");
}

fn fields(name: &str, level: Option<&str>, grade: Option<&str>) -> HaksaengFields {
    HaksaengFields {
        name: name.to_string(),
        school_name: Some("한빛초등학교".to_string()),
        level_code: level.map(str::to_string),
        grade_code: grade.map(str::to_string),
        address1: Some("서울시 중구 세종대로".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_mysql_repository_lifecycle() {
    let Some(pool) = setup_test_db().await else {
        return;
    };
    setup_test_table(&pool).await;
    let repo = MySqlHaksaengRepository::new(pool.clone());

    // next_id
    assert_eq!(repo.next_id(2024).await.unwrap(), "20240001");
    assert_eq!(repo.next_id(2024).await.unwrap(), "20240001");

    // insert
    let first = repo
        .insert("20240001", &fields("홍길동", Some("2"), Some("1")))
        .await
        .unwrap();
    repo.insert("20240002", &fields("김민수", Some("1"), Some("3")))
        .await
        .unwrap();
    repo.insert("20240003", &fields("김민지", None, None))
        .await
        .unwrap();
    assert_eq!(repo.next_id(2024).await.unwrap(), "20240004");
    assert_eq!(repo.next_id(2025).await.unwrap(), "20250001");

    // 한글이 CP949 바이트로 저장되었는지 확인
    let stored: Vec<u8> =
        sqlx::query_scalar("SELECT CAST(HAKSAENG_NM AS BINARY) FROM HJ_HAKSAENG WHERE HAKSAENG_ID = ?")
            .bind("20240001")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(stored, vec![0xC8, 0xAB, 0xB1, 0xE6, 0xB5, 0xBF]);

    // duplicate
    let err = repo
        .insert("20240001", &fields("중복", None, None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicateEntry(_)));

    // list: NULL 학교급이 먼저, 이후 학교급/학년 순
    let listed = repo.list(&HaksaengQuery::new(0, 100, None)).await.unwrap();
    let ids: Vec<&str> = listed.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["20240003", "20240002", "20240001"]);
    assert_eq!(listed[2], first);

    let filtered = repo
        .list(&HaksaengQuery::new(0, 100, Some("민".to_string())))
        .await
        .unwrap();
    assert_eq!(filtered.len(), 2);

    // "홍길" 사이의 바이트 AB B1은 "ケ"이지만 문자 경계를 넘으므로 불일치
    let crossing = repo
        .list(&HaksaengQuery::new(0, 100, Some("ケ".to_string())))
        .await
        .unwrap();
    assert!(crossing.is_empty());

    let single_char = repo
        .list(&HaksaengQuery::new(0, 100, Some("홍_동".to_string())))
        .await
        .unwrap();
    assert_eq!(single_char.len(), 1);

    let paged = repo.list(&HaksaengQuery::new(1, 1, None)).await.unwrap();
    assert_eq!(paged.len(), 1);
    assert_eq!(paged[0].id, "20240002");

    // stats
    let stats = repo.stats().await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.elementary, 1);
    assert_eq!(stats.middle, 1);

    // update
    let patch = HaksaengUpdate {
        address2: Some("101호".to_string()),
        ..Default::default()
    };
    let updated = repo.update("20240001", &patch).await.unwrap();
    assert_eq!(updated.fields.address2.as_deref(), Some("101호"));
    assert_eq!(updated.registered_at, first.registered_at);
    assert_eq!(repo.find("20240001").await.unwrap(), updated);

    let err = repo.update("20249999", &patch).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // delete
    let deleted = repo.delete("20240001").await.unwrap();
    assert_eq!(deleted, updated);
    assert!(matches!(
        repo.delete("20240001").await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert_eq!(repo.stats().await.unwrap().total, 2);
}
