//! Basic rebalance example.
//!
//! Drains two closing accounts into a single recipient and shows how the
//! operational fee is taken from the leftover surplus.

use rebalance_engine::prelude::*;

fn main() {
    println!("╔═════════════════════════════════════════════╗");
    println!("║  rebalance-engine: Basic Rebalance Example  ║");
    println!("╚═════════════════════════════════════════════╝\n");

    let closing = vec![
        ClosingAccount::new("acc1", 500),
        ClosingAccount::new("acc2", 500),
    ];
    let recipients = vec![RecipientAccount::new("rec1", 400)];

    match rebalance(&closing, &recipients) {
        Ok(result) => {
            println!("{}", result);
            println!("━━━ Per-Recipient Settlement ━━━\n");
            for recipient in &recipients {
                println!(
                    "  {:<8} owed {:>6}  paid {:>6}",
                    recipient.account_id,
                    recipient.credit,
                    result.paid_to(&recipient.account_id)
                );
            }
        }
        Err(e) => eprintln!("Rebalance failed: {}", e),
    }
}
