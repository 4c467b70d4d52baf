//! Fee shortfall example.
//!
//! Shows the two ways a rebalance can run out of funds, and how a cheaper
//! fee schedule lets an exactly-funded run go through.

use rebalance_engine::prelude::*;

fn main() {
    println!("━━━ Scenario 1: Underfunded ━━━\n");
    let closing = vec![ClosingAccount::new("acc1", 100)];
    let recipients = vec![RecipientAccount::new("rec1", 150)];
    report(rebalance(&closing, &recipients));

    println!("━━━ Scenario 2: Fee exceeds leftover ━━━\n");
    let closing = vec![ClosingAccount::new("acc1", 100)];
    let recipients = vec![RecipientAccount::new("rec1", 100)];
    report(rebalance(&closing, &recipients));

    println!("━━━ Scenario 3: Same accounts, no fee ━━━\n");
    let engine = RebalanceEngine::new(FeeSchedule::new(0));
    report(engine.rebalance(&closing, &recipients));
}

fn report(outcome: Result<RebalanceResult, RebalanceError>) {
    match outcome {
        Ok(result) => println!("{}", result),
        Err(e) => {
            let stage = e
                .funds_check()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "input".to_string());
            println!("  Rejected at {}: {}\n", stage, e);
        }
    }
}
