//! CP949 인코딩 코덱
//!
//! 저장소의 텍스트 컬럼은 레거시 한글 코드페이지(CP949)를 사용합니다.
//! 드라이버의 문자셋 협상을 신뢰할 수 없으므로 모든 텍스트는 여기서 직접
//! 바이트로 변환한 뒤 바인딩하고, 읽을 때도 바이트로 받아 여기서 복원합니다.
//!
//! `encoding_rs`의 `EUC_KR`은 WHATWG 정의상 windows-949(= CP949, 통합형 한글)입니다.

use encoding_rs::{EncoderResult, EUC_KR};
use thiserror::Error;

/// 코덱 에러
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Cp949Error {
    /// CP949로 표현할 수 없는 문자 (이모지, 확장 한자 등)
    #[error("CP949로 표현할 수 없는 문자: {character:?}")]
    Unmappable { character: char },

    /// CP949 바이트열로 해석할 수 없는 데이터
    #[error("잘못된 CP949 바이트열 ({len} bytes)")]
    Malformed { len: usize },
}

/// 유니코드 문자열을 CP949 바이트열로 변환합니다.
///
/// 대체 문자로 뭉개지 않고, 표현 불가 문자를 만나면 바로 실패합니다.
///
/// # Arguments
/// * `text` - 변환할 문자열
///
/// # Returns
/// * `Result<Vec<u8>, Cp949Error>` - CP949 바이트열 또는 첫 번째 표현 불가 문자
pub fn encode(text: &str) -> Result<Vec<u8>, Cp949Error> {
    let mut encoder = EUC_KR.new_encoder();
    let capacity = encoder
        .max_buffer_length_from_utf8_without_replacement(text.len())
        .unwrap_or(text.len() * 2);
    let mut out = Vec::with_capacity(capacity);
    let mut rest = text;

    loop {
        let (result, read) =
            encoder.encode_from_utf8_to_vec_without_replacement(rest, &mut out, true);
        rest = &rest[read..];

        match result {
            EncoderResult::InputEmpty => return Ok(out),
            EncoderResult::OutputFull => out.reserve(rest.len() * 2 + 2),
            EncoderResult::Unmappable(character) => {
                return Err(Cp949Error::Unmappable { character })
            }
        }
    }
}

/// CP949 바이트열을 유니코드 문자열로 복원합니다.
pub fn decode(bytes: &[u8]) -> Result<String, Cp949Error> {
    EUC_KR
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
        .ok_or(Cp949Error::Malformed { len: bytes.len() })
}

/// 선택 필드용 인코딩
pub fn encode_opt(text: Option<&str>) -> Result<Option<Vec<u8>>, Cp949Error> {
    text.map(encode).transpose()
}

/// 선택 필드용 디코딩
pub fn decode_opt(bytes: Option<&[u8]>) -> Result<Option<String>, Cp949Error> {
    bytes.map(decode).transpose()
}

/// 부분 일치 검색용 `%pattern%` 바이트열을 만듭니다.
///
/// 검색어 안의 `%`, `_`는 그대로 와일드카드로 남습니다.
pub fn like_pattern(filter: &str) -> Result<Vec<u8>, Cp949Error> {
    encode(&format!("%{filter}%"))
}
