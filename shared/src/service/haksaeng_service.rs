//! 학생 생명주기 서비스
//!
//! 저장소 호출을 API가 필요로 하는 작업 단위로 묶습니다.
//! `NotFound`는 호출자가 다루기 쉽도록 `None`으로 바꾸고, 그 외 에러는 그대로 전달합니다.

use crate::model::{Haksaeng, HaksaengCreate, HaksaengQuery, HaksaengStats, HaksaengUpdate};
use crate::service::db::HaksaengRepository;
use crate::tool::current_time::CurrentTime;
use crate::tool::error::AppError;
use std::sync::Arc;
use tracing::{info, warn};

/// 학생 생명주기 서비스
#[derive(Clone)]
pub struct HaksaengService {
    repository: Arc<dyn HaksaengRepository>,
}

/// 조회 실패를 `None`으로 변환
fn miss_as_none<T>(result: Result<T, AppError>) -> Result<Option<T>, AppError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(AppError::NotFound(msg)) => {
            warn!("학생 조회 실패: {}", msg);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

impl HaksaengService {
    pub fn new(repository: Arc<dyn HaksaengRepository>) -> Self {
        Self { repository }
    }

    /// 학생 목록 조회
    ///
    /// # Arguments
    /// * `skip` - 건너뛸 행 수
    /// * `limit` - 최대 행 수 (상한은 호출자 책임)
    /// * `name` - 이름 부분 일치 검색어, 빈 문자열은 필터 없음
    pub async fn list_students(
        &self,
        skip: u64,
        limit: u64,
        name: Option<String>,
    ) -> Result<Vec<Haksaeng>, AppError> {
        self.repository
            .list(&HaksaengQuery::new(skip, limit, name))
            .await
    }

    /// 학생 통계 조회
    pub async fn get_stats(&self) -> Result<HaksaengStats, AppError> {
        self.repository.stats().await
    }

    /// 현재 연도의 다음 학생 ID
    pub async fn next_student_id(&self) -> Result<String, AppError> {
        self.repository.next_id(CurrentTime::new().year()).await
    }

    /// 학생 생성
    ///
    /// ID가 없으면 현재 연도로 다음 ID를 계산합니다. 계산과 저장 사이는 원자적이지
    /// 않으므로 동시 생성 시 `AppError::DuplicateEntry`가 날 수 있고, 호출자가 재시도합니다.
    ///
    /// # Returns
    /// * `Result<Haksaeng, AppError>` - 다시 조회하지 않고 구성한 레코드
    pub async fn create_student(&self, input: HaksaengCreate) -> Result<Haksaeng, AppError> {
        input.validate()?;

        let id = match input.requested_id() {
            Some(id) => id.to_string(),
            None => self.next_student_id().await?,
        };

        let fields = input.fields.normalized();
        let created = self.repository.insert(&id, &fields).await?;

        info!("학생 생성: {} ({})", created.id, created.fields.name);
        Ok(created)
    }

    /// 학생 수정, 대상이 없으면 `None`
    pub async fn update_student(
        &self,
        id: &str,
        input: HaksaengUpdate,
    ) -> Result<Option<Haksaeng>, AppError> {
        input.validate()?;
        miss_as_none(self.repository.update(id, &input).await)
    }

    /// 학생 삭제, 대상이 없으면 `None`
    pub async fn delete_student(&self, id: &str) -> Result<Option<Haksaeng>, AppError> {
        miss_as_none(self.repository.delete(id).await)
    }

    /// 단건 조회, 대상이 없으면 `None`
    pub async fn get_student(&self, id: &str) -> Result<Option<Haksaeng>, AppError> {
        miss_as_none(self.repository.find(id).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HaksaengFields;
    use crate::service::db::MemoryHaksaengRepository;

    fn service() -> (HaksaengService, Arc<MemoryHaksaengRepository>) {
        let repo = Arc::new(MemoryHaksaengRepository::new());
        (HaksaengService::new(repo.clone()), repo)
    }

    fn create(id: Option<&str>, name: &str) -> HaksaengCreate {
        HaksaengCreate {
            id: id.map(str::to_string),
            fields: HaksaengFields {
                name: name.to_string(),
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn test_create_generates_id_for_current_year() {
        let (service, _) = service();
        let year = CurrentTime::new().year();

        let first = service.create_student(create(None, "홍길동")).await.unwrap();
        let second = service.create_student(create(Some(""), "김철수")).await.unwrap();

        assert_eq!(first.id, format!("{year}0001"));
        assert_eq!(second.id, format!("{year}0002"));
        assert!(first.registered_at.is_some());
    }

    #[tokio::test]
    async fn test_create_with_supplied_id() {
        let (service, repo) = service();
        let created = service
            .create_student(create(Some("20190007"), "홍길동"))
            .await
            .unwrap();

        assert_eq!(created.id, "20190007");
        assert_eq!(repo.find("20190007").await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_create_duplicate_id_propagates() {
        let (service, _) = service();
        service
            .create_student(create(Some("20190007"), "홍길동"))
            .await
            .unwrap();

        let err = service
            .create_student(create(Some("20190007"), "김철수"))
            .await
            .unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_create_validation_happens_before_store() {
        let (service, repo) = service();

        let err = service.create_student(create(None, "")).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));

        let err = service
            .create_student(create(None, "홍길동😀"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Encoding(_)));
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete_miss_is_none() {
        let (service, _) = service();

        let updated = service
            .update_student("20240001", HaksaengUpdate::default())
            .await
            .unwrap();
        assert!(updated.is_none());

        let deleted = service.delete_student("20240001").await.unwrap();
        assert!(deleted.is_none());
    }

    #[tokio::test]
    async fn test_update_then_delete_round() {
        let (service, repo) = service();
        let created = service.create_student(create(None, "홍길동")).await.unwrap();

        let update = HaksaengUpdate {
            school_name: Some("한빛중학교".to_string()),
            level_code: Some("2".to_string()),
            ..Default::default()
        };
        let updated = service
            .update_student(&created.id, update)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.fields.school_name.as_deref(), Some("한빛중학교"));
        assert_eq!(service.get_stats().await.unwrap().middle, 1);

        let deleted = service.delete_student(&created.id).await.unwrap().unwrap();
        assert_eq!(deleted, updated);
        assert!(repo.is_empty());
    }
}
