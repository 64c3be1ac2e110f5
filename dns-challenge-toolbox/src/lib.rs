//! DNS tooling for DNS-01 challenge automation
//!
//! 提供 TXT 记录查询与传播等待：
//! - [`ToolboxService::txt_lookup`] 单次查询
//! - [`PropagationWaiter`] 按固定间隔轮询，直到记录出现/消失或超时
//!
//! Record-management clients use the waiter to implement their
//! `wait_until_record_visible` operation. Everything here is independent of
//! any DNS provider account.

mod error;
mod services;
mod types;

pub use error::{ToolboxError, ToolboxResult};
pub use services::{HickoryTxtResolver, PropagationWaiter, ToolboxService, TxtResolver};
pub use types::{PropagationConfig, TxtLookupResult, WaitOutcome};
