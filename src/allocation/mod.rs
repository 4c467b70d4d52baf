pub mod fee;
pub mod rebalance;
pub mod waterfall;
