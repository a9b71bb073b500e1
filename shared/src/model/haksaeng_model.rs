//! 학생(HJ_HAKSAENG) 모델
//!
//! JSON 키는 기존 프론트엔드와 맞추기 위해 테이블 컬럼명을 그대로 사용합니다.
//! 레거시 이미지 컬럼(PIC)은 모델에 포함하지 않습니다.

use crate::tool::error::helpers::{validate_length, validate_optional, validate_required};
use crate::tool::error::AppError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 컬럼 최대 길이 (문자 수)
pub const ID_MAX: usize = 8;
pub const NAME_MAX: usize = 20;
pub const CODE_MAX: usize = 1;
pub const SCHOOL_MAX: usize = 30;
pub const PHONE_MAX: usize = 16;
pub const ADDR1_MAX: usize = 60;
pub const ADDR2_MAX: usize = 30;

/// 수정 가능한 학생 컬럼 묶음
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HaksaengFields {
    #[serde(rename = "HAKSAENG_NM")]
    pub name: String,
    #[serde(rename = "GENDER_CD", default)]
    pub gender_code: Option<String>,
    #[serde(rename = "HAKGYOMYEONG", default)]
    pub school_name: Option<String>,
    /// 학교급 코드 (1=초등, 2=중등, 3=고등, 4=일반)
    #[serde(rename = "CHOJUNGGO_CD", default)]
    pub level_code: Option<String>,
    #[serde(rename = "HAKNYEON", default)]
    pub grade_code: Option<String>,
    #[serde(rename = "HP_NO", default)]
    pub phone: Option<String>,
    #[serde(rename = "ADDR1", default)]
    pub address1: Option<String>,
    #[serde(rename = "ADDR2", default)]
    pub address2: Option<String>,
}

impl HaksaengFields {
    /// 컬럼 길이 제약을 검증합니다.
    pub fn validate(&self) -> Result<(), AppError> {
        validate_required(&self.name, "HAKSAENG_NM", NAME_MAX)?;
        validate_optional(self.gender_code.as_deref(), "GENDER_CD", CODE_MAX)?;
        validate_optional(self.school_name.as_deref(), "HAKGYOMYEONG", SCHOOL_MAX)?;
        validate_optional(self.level_code.as_deref(), "CHOJUNGGO_CD", CODE_MAX)?;
        validate_optional(self.grade_code.as_deref(), "HAKNYEON", CODE_MAX)?;
        validate_optional(self.phone.as_deref(), "HP_NO", PHONE_MAX)?;
        validate_optional(self.address1.as_deref(), "ADDR1", ADDR1_MAX)?;
        validate_optional(self.address2.as_deref(), "ADDR2", ADDR2_MAX)?;
        Ok(())
    }

    /// 빈 문자열로 들어온 선택 필드를 NULL로 바꿉니다.
    pub fn normalized(mut self) -> Self {
        for field in [
            &mut self.gender_code,
            &mut self.school_name,
            &mut self.level_code,
            &mut self.grade_code,
            &mut self.phone,
            &mut self.address1,
            &mut self.address2,
        ] {
            if field.as_deref() == Some("") {
                *field = None;
            }
        }
        self
    }
}

/// 학생 레코드
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Haksaeng {
    #[serde(rename = "HAKSAENG_ID")]
    pub id: String,
    #[serde(flatten)]
    pub fields: HaksaengFields,
    /// 등록일시, 생성 시 서버가 한 번만 지정
    #[serde(rename = "DUNGROK_DT", default)]
    pub registered_at: Option<NaiveDateTime>,
}

/// 학생 생성 요청
///
/// ID가 없거나 빈 문자열이면 서버가 생성합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HaksaengCreate {
    #[serde(rename = "HAKSAENG_ID", default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub fields: HaksaengFields,
}

impl HaksaengCreate {
    /// 호출자가 지정한 ID (빈 문자열은 미지정)
    pub fn requested_id(&self) -> Option<&str> {
        self.id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(id) = self.requested_id() {
            validate_length(id, "HAKSAENG_ID", ID_MAX)?;
            if !id.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(AppError::InvalidInput(format!(
                    "HAKSAENG_ID must be ASCII alphanumeric: {id}"
                )));
            }
        }
        self.fields.validate()
    }
}

/// 학생 수정 요청
///
/// 생략된 필드는 저장된 값을 유지합니다. ID와 등록일시는 수정 대상이 아닙니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HaksaengUpdate {
    #[serde(rename = "HAKSAENG_NM")]
    pub name: Option<String>,
    #[serde(rename = "GENDER_CD")]
    pub gender_code: Option<String>,
    #[serde(rename = "HAKGYOMYEONG")]
    pub school_name: Option<String>,
    #[serde(rename = "CHOJUNGGO_CD")]
    pub level_code: Option<String>,
    #[serde(rename = "HAKNYEON")]
    pub grade_code: Option<String>,
    #[serde(rename = "HP_NO")]
    pub phone: Option<String>,
    #[serde(rename = "ADDR1")]
    pub address1: Option<String>,
    #[serde(rename = "ADDR2")]
    pub address2: Option<String>,
}

impl HaksaengUpdate {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_optional(self.name.as_deref(), "HAKSAENG_NM", NAME_MAX)?;
        validate_optional(self.gender_code.as_deref(), "GENDER_CD", CODE_MAX)?;
        validate_optional(self.school_name.as_deref(), "HAKGYOMYEONG", SCHOOL_MAX)?;
        validate_optional(self.level_code.as_deref(), "CHOJUNGGO_CD", CODE_MAX)?;
        validate_optional(self.grade_code.as_deref(), "HAKNYEON", CODE_MAX)?;
        validate_optional(self.phone.as_deref(), "HP_NO", PHONE_MAX)?;
        validate_optional(self.address1.as_deref(), "ADDR1", ADDR1_MAX)?;
        validate_optional(self.address2.as_deref(), "ADDR2", ADDR2_MAX)?;
        Ok(())
    }

    /// 저장된 값 위에 요청 값을 덮어써서 전체 컬럼 값을 만듭니다.
    ///
    /// 빈 문자열은 생략과 같게 보고 기존 값을 유지합니다. 수정으로 값을 지울 수는 없습니다.
    pub fn merge_into(&self, current: &HaksaengFields) -> HaksaengFields {
        fn pick(new: &Option<String>, old: &Option<String>) -> Option<String> {
            new.as_ref()
                .filter(|value| !value.is_empty())
                .or(old.as_ref())
                .cloned()
        }

        let name = match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => current.name.clone(),
        };

        HaksaengFields {
            name,
            gender_code: pick(&self.gender_code, &current.gender_code),
            school_name: pick(&self.school_name, &current.school_name),
            level_code: pick(&self.level_code, &current.level_code),
            grade_code: pick(&self.grade_code, &current.grade_code),
            phone: pick(&self.phone, &current.phone),
            address1: pick(&self.address1, &current.address1),
            address2: pick(&self.address2, &current.address2),
        }
        .normalized()
    }
}

/// 학교급 구분
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchoolLevel {
    Elementary,
    Middle,
    High,
    General,
}

impl SchoolLevel {
    /// CHOJUNGGO_CD 값을 학교급으로 변환합니다. 알 수 없는 코드는 `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "1" => Some(SchoolLevel::Elementary),
            "2" => Some(SchoolLevel::Middle),
            "3" => Some(SchoolLevel::High),
            "4" => Some(SchoolLevel::General),
            _ => None,
        }
    }
}

/// 학생 통계
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HaksaengStats {
    pub total: i64,
    pub elementary: i64,
    pub middle: i64,
    pub high: i64,
    pub general: i64,
}

impl HaksaengStats {
    /// 학교급 코드별 집계를 반영합니다.
    ///
    /// 알 수 없는 코드나 NULL은 어떤 학교급에도 더하지 않습니다 (`total`은 별도 집계).
    pub fn add_level(&mut self, level_code: Option<&str>, count: i64) {
        match level_code.and_then(SchoolLevel::from_code) {
            Some(SchoolLevel::Elementary) => self.elementary += count,
            Some(SchoolLevel::Middle) => self.middle += count,
            Some(SchoolLevel::High) => self.high += count,
            Some(SchoolLevel::General) => self.general += count,
            None => {}
        }
    }
}

/// 목록 조회 조건
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HaksaengQuery {
    pub offset: u64,
    pub limit: u64,
    pub name_filter: Option<String>,
}

impl HaksaengQuery {
    pub fn new(offset: u64, limit: u64, name_filter: Option<String>) -> Self {
        Self {
            offset,
            limit,
            name_filter: name_filter.filter(|name| !name.is_empty()),
        }
    }
}
