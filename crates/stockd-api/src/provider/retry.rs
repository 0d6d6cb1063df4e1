//! 선형 백오프 재시도 헬퍼.
//!
//! 재시도 로직을 (최대 시도 횟수, 백오프 스케줄, 연산)을 받는 순수 함수로
//! 분리하여 가짜 연산과 tokio의 가상 시계로 독립적으로 테스트할 수 있게
//! 합니다.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

/// 재시도 정책.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// 최대 시도 횟수 (1 이상)
    pub max_attempts: u32,
    /// 백오프 단위. n번째 실패 후 `base_delay * n` 대기.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// n번째 시도 실패 후의 대기 시간.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

/// 모든 시도가 소진된 재시도 결과.
#[derive(Debug)]
pub struct RetryExhausted<E> {
    /// 수행된 시도 횟수
    pub attempts: u32,
    /// 마지막 시도의 에러
    pub last_error: E,
}

impl<E: std::fmt::Display> std::fmt::Display for RetryExhausted<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "attempt {}: {}",
            self.attempts, self.last_error
        )
    }
}

/// 연산을 선형 백오프로 재시도합니다.
///
/// 각 시도 실패 후 `base_delay * attempt`만큼 대기하며 (1배, 2배, ...),
/// 마지막 시도 실패 후에는 대기하지 않습니다. 첫 성공 결과를 즉시
/// 반환하고, 모든 시도가 실패하면 마지막 에러와 시도 횟수를 담은
/// [`RetryExhausted`]를 반환합니다.
///
/// # Arguments
///
/// * `policy` - 시도 횟수와 백오프 스케줄
/// * `op` - 시도 번호(1부터)를 받아 Future를 돌려주는 연산
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: &RetryPolicy,
    mut op: F,
) -> Result<T, RetryExhausted<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts => {
                let delay = policy.delay_after(attempt);
                debug!(
                    attempt = attempt,
                    max_attempts = max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Retrying after backoff"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                return Err(RetryExhausted {
                    attempts: attempt,
                    last_error: e,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_first_attempt_success_no_backoff() {
        let policy = RetryPolicy::default();
        let calls = AtomicU32::new(0);

        let result: Result<u32, RetryExhausted<String>> =
            retry_with_backoff(&policy, |_attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(42) }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_after_max_attempts() {
        let policy = RetryPolicy::default();
        let calls = AtomicU32::new(0);

        let result: Result<u32, RetryExhausted<String>> =
            retry_with_backoff(&policy, |attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move { Err(format!("boom {}", attempt)) }
            })
            .await;

        let err = result.unwrap_err();
        assert_eq!(err.attempts, 3);
        assert_eq!(err.last_error, "boom 3");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_linear_backoff_schedule() {
        // 3회 실패: 1번째 후 1초, 2번째 후 2초 대기, 3번째 후에는 대기 없음
        let policy = RetryPolicy::default();
        let start = tokio::time::Instant::now();

        let result: Result<(), RetryExhausted<String>> =
            retry_with_backoff(&policy, |_attempt| async { Err("unavailable".to_string()) })
                .await;

        assert!(result.is_err());
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_on_later_attempt() {
        let policy = RetryPolicy::default();

        let result: Result<u32, RetryExhausted<String>> =
            retry_with_backoff(&policy, |attempt| async move {
                if attempt < 3 {
                    Err("transient".to_string())
                } else {
                    Ok(attempt)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 3);
    }

    #[test]
    fn test_delay_after_is_linear() {
        let policy = RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        };
        assert_eq!(policy.delay_after(1), Duration::from_secs(1));
        assert_eq!(policy.delay_after(2), Duration::from_secs(2));
    }
}
