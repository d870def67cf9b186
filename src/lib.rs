// ledger-core: multi-currency ledger and settlement engine.
// correctness-first bookkeeping: every multi-row mutation commits or fails as
// one unit, and no code path leaves a balance or position negative.
// all computation is deterministic with no external I/O.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: UserId, Currency, Symbol, Cash, Price
//   2.x  account.rs: per-user balances + debit/credit paths
//   3.x  portfolio.rs: positions, weighted-average lot accounting
//   4.x  transaction.rs: append-only buy/sell history
//   5.x  transfer.rs: outbound transfer workflow, pending -> settled
//   6.x  trade.rs: single-slot escrowed trade positions
//   7.x  rates.rs: fixed conversion rate table
//   8.x  events.rs: state transition events for audit
//   9.x  price_feed.rs: market quote lookup (mocked)
//   10.x engine/: operation surface: trading, convert, transfers, trades
//   11.x sync.rs: shared locked handle, one closure = one atomic unit

// core ledger modules
pub mod account;
pub mod engine;
pub mod events;
pub mod portfolio;
pub mod rates;
pub mod trade;
pub mod transaction;
pub mod transfer;
pub mod types;

// integration modules
pub mod price_feed;
pub mod sync;

// re exports for convenience
pub use account::*;
pub use engine::*;
pub use events::*;
pub use portfolio::*;
pub use rates::*;
pub use trade::*;
pub use transaction::*;
pub use transfer::*;
pub use types::*;
pub use price_feed::{PriceQuote, PriceSource, StaticPriceSource};
pub use sync::SharedEngine;
