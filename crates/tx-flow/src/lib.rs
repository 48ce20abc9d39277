//! tx-flow: Transaction lifecycle for contract interactions
//!
//! Every contract action in the frame follows the same sequence:
//! check allowance, approve if needed, submit the action, wait for the
//! receipt, then refresh the reads that depend on it. This crate provides
//! that sequence once, parameterized by an [`ActionRequest`], together with
//! the two read-side helpers every feature needs:
//!
//! - [`Estimator`]: debounced display-only estimates ("100 USDC → ~2000 CHICKS")
//! - [`PositionReader`]: account-scoped snapshots of on-chain positions
//!
//! # Example
//!
//! ```ignore
//! let orchestrator = Orchestrator::new(wallet, chain, config.tx_flow.clone());
//! let request = ActionRequest::new(OperationKind::Buy, buy_call)
//!     .with_approval(usdc, chicks, amount, "USDC");
//! orchestrator.execute(request).await?;
//! println!("{}", orchestrator.status_message());
//! ```

pub mod allowance;
pub mod estimator;
pub mod operation;
pub mod orchestrator;
pub mod position;
pub mod status;

pub use allowance::{allowance_state, AllowanceState};
pub use estimator::{CallSource, Estimate, EstimateSource, Estimator, FormulaSource};
pub use operation::{ActionRequest, ApprovalRequirement, OperationKind, PendingOperation, Step};
pub use orchestrator::{Orchestrator, RefreshHook, SuccessHook};
pub use position::{PositionQuery, PositionReader};
pub use status::{truncate_message, FlowStatus};
