use chrono::{DateTime, Datelike, Local, NaiveDateTime, Timelike};

/// 서버 시계 기준 현재 시각
///
/// 등록일시는 초 단위로 잘라서 저장합니다. DATETIME 컬럼 정밀도와 맞춰야
/// 생성 응답과 이후 조회 결과가 같은 값이 됩니다.
pub struct CurrentTime {
    pub now: DateTime<Local>,
}

impl CurrentTime {
    pub fn new() -> Self {
        Self { now: Local::now() }
    }

    /// ID 접두사로 쓰는 현재 연도
    pub fn year(&self) -> i32 {
        self.now.year()
    }

    /// 등록일시(DUNGROK_DT) 값
    pub fn registered_at(&self) -> NaiveDateTime {
        let naive = self.now.naive_local();
        naive.with_nanosecond(0).unwrap_or(naive)
    }
}

impl Default for CurrentTime {
    fn default() -> Self {
        Self::new()
    }
}
