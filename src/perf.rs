use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

static RUN_COUNT: AtomicU64 = AtomicU64::new(0);
static EVENT_COUNT: AtomicU64 = AtomicU64::new(0);
static SLOW_RUN_COUNT: AtomicU64 = AtomicU64::new(0);
static SLOW_RUN_THRESHOLD_MS: OnceLock<u64> = OnceLock::new();

thread_local! {
    static PERF_DEPTH: Cell<u32> = Cell::new(0);
}

/// 慢仿真阈值（毫秒）
///
/// - `HAUL_FLEET_SIM_SLOW_RUN_MS=50` 配置阈值；0 表示关闭
/// - 默认：Debug 200ms，Release 50ms
fn slow_run_threshold_ms() -> u64 {
    *SLOW_RUN_THRESHOLD_MS.get_or_init(|| {
        std::env::var("HAUL_FLEET_SIM_SLOW_RUN_MS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(if cfg!(debug_assertions) { 200 } else { 50 })
    })
}

/// 记录一次完成的仿真运行（事件数 + 耗时）
///
/// 由仿真引擎在每次运行结束时调用；可在任意线程调用
pub fn record_run(events: u64, elapsed: Duration, scenario_label: &str) {
    RUN_COUNT.fetch_add(1, Ordering::Relaxed);
    EVENT_COUNT.fetch_add(events, Ordering::Relaxed);

    let ms = elapsed.as_millis() as u64;
    let threshold = slow_run_threshold_ms();
    if threshold > 0 && ms >= threshold {
        SLOW_RUN_COUNT.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(
            target: "slow_run",
            duration_ms = ms,
            events,
            scenario = %scenario_label,
            "slow simulation run"
        );
    }
}

/// 性能统计 Guard：记录 elapsed_ms + 仿真运行数 + 事件数 + 慢运行数
///
/// 计数为进程级累计量的差值；并发 Guard 之间会互相计入
///
/// 使用方式：
/// ```ignore
/// let _perf = haul_fleet_sim::perf::PerfGuard::new("recommend");
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    run_start: u64,
    event_start: u64,
    slow_run_start: u64,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        PERF_DEPTH.with(|d| d.set(d.get().saturating_add(1)));
        Self {
            op,
            start: Instant::now(),
            run_start: RUN_COUNT.load(Ordering::Relaxed),
            event_start: EVENT_COUNT.load(Ordering::Relaxed),
            slow_run_start: SLOW_RUN_COUNT.load(Ordering::Relaxed),
        }
    }

    /// 当前线程嵌套的 Guard 层数
    pub fn depth() -> u32 {
        PERF_DEPTH.with(|d| d.get())
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_millis() as u64;
        let run_count = RUN_COUNT
            .load(Ordering::Relaxed)
            .saturating_sub(self.run_start);
        let event_count = EVENT_COUNT
            .load(Ordering::Relaxed)
            .saturating_sub(self.event_start);
        let slow_run_count = SLOW_RUN_COUNT
            .load(Ordering::Relaxed)
            .saturating_sub(self.slow_run_start);

        tracing::info!(
            target: "perf",
            op = self.op,
            elapsed_ms,
            run_count,
            event_count,
            slow_run_count,
            "done"
        );

        PERF_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_depth_and_counters() {
        assert_eq!(PerfGuard::depth(), 0);
        {
            let _outer = PerfGuard::new("outer");
            let _inner = PerfGuard::new("inner");
            assert_eq!(PerfGuard::depth(), 2);

            let before = EVENT_COUNT.load(Ordering::Relaxed);
            record_run(42, Duration::from_millis(1), "test");
            assert!(EVENT_COUNT.load(Ordering::Relaxed) >= before + 42);
        }
        assert_eq!(PerfGuard::depth(), 0);
    }
}
