//! 학생 저장소 인터페이스
//!
//! HJ_HAKSAENG 테이블에 대한 모든 작업을 정의합니다.
//! 텍스트 컬럼은 반드시 CP949 바이트로 변환된 뒤 저장소에 도달합니다.

use crate::model::{Haksaeng, HaksaengFields, HaksaengQuery, HaksaengStats, HaksaengUpdate};
use crate::tool::cp949;
use crate::tool::error::AppError;
use async_trait::async_trait;

/// 학생 저장소 trait
///
/// 모든 쓰기 작업은 단일 문장으로 자동 커밋됩니다. 조회 후 수정/삭제는
/// 하나의 트랜잭션으로 묶이지 않습니다.
#[async_trait]
pub trait HaksaengRepository: Send + Sync {
    /// 학교급, 학년, 이름 순으로 정렬된 목록을 조회합니다.
    ///
    /// 이름 필터는 문자 단위 부분 일치로 비교합니다 (`%`, `_`는 와일드카드).
    async fn list(&self, query: &HaksaengQuery) -> Result<Vec<Haksaeng>, AppError>;

    /// 전체 수와 학교급별 수를 집계합니다.
    async fn stats(&self) -> Result<HaksaengStats, AppError>;

    /// ID로 학생을 조회합니다. 없으면 `AppError::NotFound`.
    async fn find(&self, id: &str) -> Result<Haksaeng, AppError>;

    /// 학생을 저장합니다. 등록일시는 저장소가 지정합니다.
    ///
    /// 같은 ID가 이미 있으면 `AppError::DuplicateEntry`.
    async fn insert(&self, id: &str, fields: &HaksaengFields) -> Result<Haksaeng, AppError>;

    /// 해당 연도의 다음 학생 ID를 계산합니다. 저장 상태에 대한 순수 함수입니다.
    async fn next_id(&self, year: i32) -> Result<String, AppError>;

    /// 전체 컬럼을 다시 씁니다. 생략된 필드는 기존 값으로 채웁니다.
    async fn update(&self, id: &str, patch: &HaksaengUpdate) -> Result<Haksaeng, AppError>;

    /// 학생을 삭제하고 삭제 전 레코드를 반환합니다.
    async fn delete(&self, id: &str) -> Result<Haksaeng, AppError>;
}

/// CP949로 변환된 컬럼 값
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFields {
    pub name: Vec<u8>,
    pub gender_code: Option<Vec<u8>>,
    pub school_name: Option<Vec<u8>>,
    pub level_code: Option<Vec<u8>>,
    pub grade_code: Option<Vec<u8>>,
    pub phone: Option<Vec<u8>>,
    pub address1: Option<Vec<u8>>,
    pub address2: Option<Vec<u8>>,
}

impl EncodedFields {
    /// 모든 텍스트 필드를 CP949로 변환합니다.
    pub fn encode(fields: &HaksaengFields) -> Result<Self, AppError> {
        Ok(Self {
            name: cp949::encode(&fields.name)?,
            gender_code: cp949::encode_opt(fields.gender_code.as_deref())?,
            school_name: cp949::encode_opt(fields.school_name.as_deref())?,
            level_code: cp949::encode_opt(fields.level_code.as_deref())?,
            grade_code: cp949::encode_opt(fields.grade_code.as_deref())?,
            phone: cp949::encode_opt(fields.phone.as_deref())?,
            address1: cp949::encode_opt(fields.address1.as_deref())?,
            address2: cp949::encode_opt(fields.address2.as_deref())?,
        })
    }

    /// 저장소에서 읽은 바이트를 문자열로 복원합니다.
    pub fn decode(&self) -> Result<HaksaengFields, AppError> {
        Ok(HaksaengFields {
            name: cp949::decode(&self.name)?,
            gender_code: cp949::decode_opt(self.gender_code.as_deref())?,
            school_name: cp949::decode_opt(self.school_name.as_deref())?,
            level_code: cp949::decode_opt(self.level_code.as_deref())?,
            grade_code: cp949::decode_opt(self.grade_code.as_deref())?,
            phone: cp949::decode_opt(self.phone.as_deref())?,
            address1: cp949::decode_opt(self.address1.as_deref())?,
            address2: cp949::decode_opt(self.address2.as_deref())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_text_field_is_encoded() {
        let fields = HaksaengFields {
            name: "홍길동".to_string(),
            school_name: Some("한빛초등학교".to_string()),
            address1: Some("서울시 중구".to_string()),
            level_code: Some("1".to_string()),
            ..Default::default()
        };

        let encoded = EncodedFields::encode(&fields).unwrap();
        assert_eq!(encoded.name, cp949::encode("홍길동").unwrap());
        assert_eq!(encoded.level_code.as_deref(), Some(&b"1"[..]));
        assert_eq!(encoded.decode().unwrap(), fields);
    }

    #[test]
    fn test_unmappable_field_fails_whole_record() {
        let fields = HaksaengFields {
            name: "홍길동".to_string(),
            address2: Some("🏠 101호".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            EncodedFields::encode(&fields),
            Err(AppError::Encoding(_))
        ));
    }
}
