// ==========================================
// 车队班次仿真 - 挖掘机资源池
// ==========================================
// 职责: N 个装载许可的计数资源 (N = 场景挖机数)
// 规则: FIFO 申请/释放,无优先级,无抢占
// 输出: 每次获得许可的等待时长累计为运行级排队小时
// ==========================================

use crate::error::{SimResult, SimulationError};
use std::collections::VecDeque;

/// 申请结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Acquire {
    /// 立即获得许可
    Granted,
    /// 进入等待队列 (当前队首之后的位置)
    Queued { position: usize },
}

/// 释放后转交给队首等待者的许可
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handoff {
    pub slot: usize,
    pub waited_hours: f64,
}

#[derive(Debug, Clone, Copy)]
struct Waiter {
    slot: usize,
    requested_at: f64,
}

// ==========================================
// ExcavatorPool - 挖掘机资源池
// ==========================================
#[derive(Debug, Clone)]
pub struct ExcavatorPool {
    capacity: u32,
    in_use: u32,
    waiters: VecDeque<Waiter>,
    total_wait_hours: f64,
    grants: u64,
    max_queue_len: usize,
}

impl ExcavatorPool {
    pub fn new(capacity: u32) -> SimResult<Self> {
        if capacity == 0 {
            return Err(SimulationError::invalid("excavator_count", "挖掘机资源池容量必须大于0"));
        }
        Ok(Self {
            capacity,
            in_use: 0,
            waiters: VecDeque::new(),
            total_wait_hours: 0.0,
            grants: 0,
            max_queue_len: 0,
        })
    }

    /// 申请许可
    ///
    /// 有空闲许可且无人排队时立即授予,否则排到队尾
    pub fn request(&mut self, slot: usize, now: f64) -> Acquire {
        if self.in_use < self.capacity && self.waiters.is_empty() {
            self.in_use += 1;
            self.grants += 1;
            return Acquire::Granted;
        }
        self.waiters.push_back(Waiter {
            slot,
            requested_at: now,
        });
        self.max_queue_len = self.max_queue_len.max(self.waiters.len());
        Acquire::Queued {
            position: self.waiters.len() - 1,
        }
    }

    /// 释放许可
    ///
    /// # 返回
    /// - Some(Handoff): 许可直接转交给队首等待者
    /// - None: 许可归还空闲
    pub fn release(&mut self, now: f64) -> SimResult<Option<Handoff>> {
        if self.in_use == 0 {
            return Err(SimulationError::InternalError(
                "挖掘机许可释放次数超过申请次数".to_string(),
            ));
        }

        match self.waiters.pop_front() {
            Some(waiter) => {
                let waited_hours = (now - waiter.requested_at).max(0.0);
                self.total_wait_hours += waited_hours;
                self.grants += 1;
                Ok(Some(Handoff {
                    slot: waiter.slot,
                    waited_hours,
                }))
            }
            None => {
                self.in_use -= 1;
                Ok(None)
            }
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn in_use(&self) -> u32 {
        self.in_use
    }

    pub fn queue_len(&self) -> usize {
        self.waiters.len()
    }

    pub fn max_queue_len(&self) -> usize {
        self.max_queue_len
    }

    /// 累计排队小时 (只增不减)
    pub fn total_wait_hours(&self) -> f64 {
        self.total_wait_hours
    }

    pub fn grants(&self) -> u64 {
        self.grants
    }
}
