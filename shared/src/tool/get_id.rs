//! 학생 ID 생성 유틸리티
//!
//! 학생 ID는 `YYYY####` 형식(연도 4자리 + 일련번호 4자리)입니다.

/// 연도별 첫 번째 일련번호
const FIRST_SEQUENCE: &str = "0001";

/// 해당 연도의 첫 번째 학생 ID를 반환합니다.
pub fn first_haksaeng_id(year: i32) -> String {
    format!("{year}{FIRST_SEQUENCE}")
}

/// 현재 연도의 최대 ID로부터 다음 학생 ID를 계산합니다.
///
/// 최대 ID 전체를 숫자로 보고 1을 더합니다. 일련번호 자리만 따로 증가시키지 않으므로
/// `{year}9999` 다음은 다음 해 접두사를 가진 `{year+1}0000`이 됩니다.
/// 숫자가 아닌 최대 ID(손상 데이터)는 첫 번째 ID로 대체합니다.
///
/// # Arguments
/// * `year` - 현재 연도
/// * `max_id` - 해당 연도로 시작하는 ID 중 최대값
///
/// # Returns
/// * `String` - 다음 학생 ID
pub fn next_haksaeng_id(year: i32, max_id: Option<&str>) -> String {
    match max_id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => match id.parse::<u64>() {
            Ok(num) => (num + 1).to_string(),
            Err(_) => {
                tracing::warn!("숫자가 아닌 최대 학생 ID 발견: {}, 기본값 사용", id);
                first_haksaeng_id(year)
            }
        },
        None => first_haksaeng_id(year),
    }
}

/// 연도 접두사 검색 패턴 (`2024%`)
pub fn year_prefix_pattern(year: i32) -> String {
    format!("{year}%")
}
