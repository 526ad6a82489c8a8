//! Bounded retry
//!
//! Every logical operation against the card (identification, wide-bus
//! switch, block read, block write) gets a fixed number of attempts.
//! Attempts run back-to-back; the collaborator's own timeout bounds each
//! one. Running out of attempts turns the last failure into a hard failure.

/// Number of attempts allowed for one logical operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetryBudget(u8);

impl RetryBudget {
    /// Default attempts per operation
    pub const DEFAULT: RetryBudget = RetryBudget(3);

    /// Create a budget of `attempts`
    ///
    /// A budget of 0 would never try at all, so it is raised to 1.
    pub const fn new(attempts: u8) -> Self {
        if attempts == 0 {
            RetryBudget(1)
        } else {
            RetryBudget(attempts)
        }
    }

    /// Total attempts allowed
    pub const fn attempts(self) -> u8 {
        self.0
    }
}

impl Default for RetryBudget {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Successful outcome of a retried operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Success<T> {
    /// Value from the successful attempt
    pub value: T,
    /// Attempts used, including the successful one
    pub attempts: u8,
}

/// All attempts failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exhausted<E> {
    /// Error from the final attempt
    pub last_error: E,
    /// Attempts used (always the full budget)
    pub attempts: u8,
}

/// Run `attempt` until it succeeds or the budget is spent
///
/// `attempt` receives the 1-based attempt number. Each failure consumes one
/// unit of budget; success returns immediately.
pub fn retry<T, E, F>(budget: RetryBudget, attempt: F) -> Result<Success<T>, Exhausted<E>>
where
    F: FnMut(u8) -> Result<T, E>,
{
    retry_with(budget, || {}, attempt)
}

/// [`retry`] with a hook run before every attempt
///
/// Used to feed the watchdog; the hook has no say in the outcome.
pub fn retry_with<T, E, H, F>(
    budget: RetryBudget,
    mut before_attempt: H,
    mut attempt: F,
) -> Result<Success<T>, Exhausted<E>>
where
    H: FnMut(),
    F: FnMut(u8) -> Result<T, E>,
{
    let mut remaining = budget.attempts();
    let mut number = 0u8;

    loop {
        before_attempt();
        number += 1;

        match attempt(number) {
            Ok(value) => {
                return Ok(Success {
                    value,
                    attempts: number,
                })
            }
            Err(e) => {
                remaining -= 1;
                if remaining == 0 {
                    return Err(Exhausted {
                        last_error: e,
                        attempts: number,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_attempt_succeeds() {
        let mut calls = 0;
        let result = retry(RetryBudget::new(3), |_| {
            calls += 1;
            Ok::<_, ()>(42)
        });

        assert_eq!(result, Ok(Success { value: 42, attempts: 1 }));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_succeeds_after_failures() {
        let result = retry(RetryBudget::new(3), |n| if n < 3 { Err(n) } else { Ok(n) });
        assert_eq!(result, Ok(Success { value: 3, attempts: 3 }));
    }

    #[test]
    fn test_exhausted_reports_last_error() {
        let mut calls = 0;
        let result: Result<Success<()>, _> = retry(RetryBudget::new(4), |n| {
            calls += 1;
            Err(n * 10)
        });

        assert_eq!(
            result,
            Err(Exhausted {
                last_error: 40,
                attempts: 4
            })
        );
        assert_eq!(calls, 4);
    }

    #[test]
    fn test_budget_of_one_never_retries() {
        let mut calls = 0;
        let result: Result<Success<()>, _> = retry(RetryBudget::new(1), |_| {
            calls += 1;
            Err(())
        });

        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_zero_budget_still_attempts_once() {
        assert_eq!(RetryBudget::new(0).attempts(), 1);
        let mut calls = 0;
        let _ = retry(RetryBudget::new(0), |_| {
            calls += 1;
            Err::<(), _>(())
        });
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_hook_runs_before_every_attempt() {
        let mut hooks = 0u8;
        let mut seen = [0u8; 3];
        let result = retry_with(
            RetryBudget::new(3),
            || hooks += 1,
            |n| {
                seen[n as usize - 1] = n;
                if n == 2 {
                    Ok(())
                } else {
                    Err(())
                }
            },
        );

        assert!(result.is_ok());
        assert_eq!(hooks, 2);
        assert_eq!(seen, [1, 2, 0]);
    }

    #[test]
    fn test_max_budget() {
        let result: Result<Success<()>, _> = retry(RetryBudget::new(u8::MAX), |_| Err(()));
        assert_eq!(result.unwrap_err().attempts, u8::MAX);
    }
}
