/// Snowflake ID 생성기
/// Snowflake ID Generator
///
/// 역할:
/// - 사용자, 지갑, 거래 등 모든 엔티티의 기본 키 생성
/// - 64비트 정수: 타임스탬프(ms) | 머신 ID(10비트) | 시퀀스(10비트)
///
/// 비트 구성 (Bit layout):
/// ```text
/// | 0 | timestamp since EPOCH (43 bits) | machine id (10 bits) | sequence (10 bits) |
/// ```
///
/// 사용 방법:
/// ```rust,ignore
/// let ids = SnowflakeGenerator::new(config.snowflake.machine_id)?;
/// let wallet_id = ids.next_id();
/// ```
///
/// 머신 ID는 서버 시작 시 설정에서 한 번 읽어서 AppState를 통해 전달됨
/// (전역 변수 없음)

use chrono::Utc;
use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;

/// 커스텀 에포크: 2024-01-01T00:00:00Z (ms)
pub const EPOCH_MS: i64 = 1_704_067_200_000;

pub const MACHINE_ID_BITS: u32 = 10;
pub const SEQUENCE_BITS: u32 = 10;
pub const MAX_MACHINE_ID: u16 = (1 << MACHINE_ID_BITS) - 1;
const MAX_SEQUENCE: u16 = (1 << SEQUENCE_BITS) - 1;
const TIMESTAMP_SHIFT: u32 = MACHINE_ID_BITS + SEQUENCE_BITS;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum IdGeneratorError {
    #[error("Machine id {0} out of range (0..={max})", max = MAX_MACHINE_ID)]
    MachineIdOutOfRange(u16),
}

#[derive(Debug)]
struct GeneratorState {
    /// 마지막으로 발급한 타임스탬프 (EPOCH 기준 ms)
    last_ms: i64,
    /// 같은 ms 안에서의 시퀀스
    sequence: u16,
}

/// 스레드 안전한 Snowflake ID 생성기
/// Thread-safe Snowflake ID generator
///
/// Clone 시 내부 상태를 공유하므로 AppState에 그대로 넣어서 사용
#[derive(Clone, Debug)]
pub struct SnowflakeGenerator {
    machine_id: u16,
    state: Arc<Mutex<GeneratorState>>,
}

/// ID 분해 결과 (디버깅용)
/// Decomposed ID parts (for debugging)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnowflakeParts {
    /// Unix timestamp (ms)
    pub timestamp_ms: i64,
    pub machine_id: u16,
    pub sequence: u16,
}

impl SnowflakeGenerator {
    /// 생성자
    /// Constructor
    ///
    /// # Arguments
    /// * `machine_id` - 0..=1023 범위의 머신 ID
    pub fn new(machine_id: u16) -> Result<Self, IdGeneratorError> {
        if machine_id > MAX_MACHINE_ID {
            return Err(IdGeneratorError::MachineIdOutOfRange(machine_id));
        }

        Ok(Self {
            machine_id,
            state: Arc::new(Mutex::new(GeneratorState {
                last_ms: 0,
                sequence: 0,
            })),
        })
    }

    pub fn machine_id(&self) -> u16 {
        self.machine_id
    }

    /// 다음 ID 생성
    /// Generate next ID
    ///
    /// # Returns
    /// 양수 i64로 표현 가능한 u64 ID (PostgreSQL BIGINT 저장 가능)
    pub fn next_id(&self) -> u64 {
        self.next_id_at(Utc::now().timestamp_millis())
    }

    /// 주어진 시각(Unix ms)을 기준으로 다음 ID 생성
    /// Generate next ID for a given wall-clock time
    ///
    /// - 같은 ms: 시퀀스 증가
    /// - 시퀀스 소진 (1024개): 다음 ms로 이동
    /// - 시계가 뒤로 간 경우: 마지막 타임스탬프를 계속 사용 (중복 방지)
    pub fn next_id_at(&self, now_unix_ms: i64) -> u64 {
        let now = (now_unix_ms - EPOCH_MS).max(0);
        let mut state = self.state.lock();

        if now > state.last_ms {
            state.last_ms = now;
            state.sequence = 0;
        } else if state.sequence < MAX_SEQUENCE {
            state.sequence += 1;
        } else {
            state.last_ms += 1;
            state.sequence = 0;
        }

        compose(state.last_ms, self.machine_id, state.sequence)
    }
}

fn compose(elapsed_ms: i64, machine_id: u16, sequence: u16) -> u64 {
    ((elapsed_ms as u64) << TIMESTAMP_SHIFT)
        | (u64::from(machine_id & MAX_MACHINE_ID) << SEQUENCE_BITS)
        | u64::from(sequence & MAX_SEQUENCE)
}

/// ID를 타임스탬프 / 머신 ID / 시퀀스로 분해
/// Split an ID back into its parts
pub fn decompose(id: u64) -> SnowflakeParts {
    SnowflakeParts {
        timestamp_ms: (id >> TIMESTAMP_SHIFT) as i64 + EPOCH_MS,
        machine_id: ((id >> SEQUENCE_BITS) as u16) & MAX_MACHINE_ID,
        sequence: (id as u16) & MAX_SEQUENCE,
    }
}
