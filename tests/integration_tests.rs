use approx::assert_relative_eq;
use rebalance_engine::allocation::fee::{deduct_fee, FeeSchedule};
use rebalance_engine::allocation::rebalance::{
    rebalance, FundsCheck, RebalanceEngine, RebalanceError,
};
use rebalance_engine::allocation::waterfall::create_transfers;
use rebalance_engine::core::account::{AccountId, ClosingAccount, RecipientAccount};
use rebalance_engine::core::transfer::Transfer;

/// Two closing accounts, one recipient: leftovers absorb the fee from the tail.
#[test]
fn leftover_absorbs_fee_from_tail() {
    let closing = vec![
        ClosingAccount::new("acc1", 500),
        ClosingAccount::new("acc2", 500),
    ];
    let recipients = vec![RecipientAccount::new("rec1", 400)];

    let result = rebalance(&closing, &recipients).unwrap();

    assert_eq!(
        result.transfers(),
        &[
            Transfer::payment("acc1", "rec1", 400),
            Transfer::leftover("acc1", 100),
            Transfer::leftover("acc2", 470),
        ]
    );
    assert_eq!(result.operational_fee(), 30);
    assert_eq!(result.gross_total(), 1000);
    assert_eq!(result.total_paid(), 400);
    assert_eq!(result.total_leftover(), 570);
    assert_relative_eq!(result.fee_ratio(), 0.03);
}

/// Closing surplus below credit fails before any transfer is planned.
#[test]
fn precheck_rejects_underfunded_run() {
    let closing = vec![ClosingAccount::new("acc1", 100)];
    let recipients = vec![RecipientAccount::new("rec1", 150)];

    let err = rebalance(&closing, &recipients).unwrap_err();
    assert_eq!(err.funds_check(), Some(FundsCheck::PreCheck));
    assert!(err.to_string().starts_with("not enough funds for rebalance"));
}

/// Many small payments drive the fee above what is left over.
#[test]
fn many_small_payments_exhaust_fee_pool() {
    let closing = vec![ClosingAccount::new("acc1", 1000)];
    let recipients: Vec<RecipientAccount> = (0..99)
        .map(|i| RecipientAccount::new(format!("rec{}", i), 10))
        .collect();

    // 99 payments + 1 leftover of 10 → fee 1000 against a pool of 10.
    let err = rebalance(&closing, &recipients).unwrap_err();
    assert_eq!(
        err,
        RebalanceError::InsufficientFunds {
            stage: FundsCheck::Fee,
            available: 10,
            required: 1000,
        }
    );
}

/// Two small recipients against a large surplus leave ample room for the fee.
#[test]
fn two_small_recipients_fit_within_pool() {
    let closing = vec![ClosingAccount::new("acc1", 1000)];
    let recipients = vec![
        RecipientAccount::new("rec1", 10),
        RecipientAccount::new("rec2", 10),
    ];

    let result = rebalance(&closing, &recipients).unwrap();
    assert_eq!(result.operational_fee(), 30);
    assert_eq!(
        result.transfers(),
        &[
            Transfer::payment("acc1", "rec1", 10),
            Transfer::payment("acc1", "rec2", 10),
            Transfer::leftover("acc1", 950),
        ]
    );
}

/// An exact match leaves a zero leftover that never reaches the output.
#[test]
fn zero_leftover_is_filtered() {
    let closing = vec![ClosingAccount::new("acc1", 100)];
    let recipients = vec![RecipientAccount::new("rec1", 100)];

    let result = RebalanceEngine::new(FeeSchedule::new(0))
        .rebalance(&closing, &recipients)
        .unwrap();
    assert_eq!(result.charged_entries(), 2);
    assert_eq!(result.transfers(), &[Transfer::payment("acc1", "rec1", 100)]);
    assert!(result.transfers().iter().all(|t| t.amount() > 0));

    // With the default schedule the same inputs cannot pay the fee.
    let err = rebalance(&closing, &recipients).unwrap_err();
    assert_eq!(err.funds_check(), Some(FundsCheck::Fee));
}

/// Threading allocator output by hand reproduces the orchestrator's payments.
#[test]
fn allocator_chain_matches_orchestrator() {
    let closing = vec![
        ClosingAccount::new("acc1", 70),
        ClosingAccount::new("acc2", 200),
    ];
    let recipients = vec![
        RecipientAccount::new("rec1", 50),
        RecipientAccount::new("rec2", 60),
    ];

    let first = create_transfers(&closing[0], &recipients);
    assert_eq!(first.remaining_recipients, vec![RecipientAccount::new("rec2", 40)]);
    let second = create_transfers(&closing[1], &first.remaining_recipients);
    assert!(second.recipients_exhausted());

    let mut expected: Vec<Transfer> = first.transfers;
    expected.extend(second.transfers);
    expected.push(Transfer::leftover("acc2", second.closing_account.amount));
    let expected = deduct_fee(40, expected);

    let result = rebalance(&closing, &recipients).unwrap();
    assert_eq!(result.transfers(), expected.as_slice());
    assert_eq!(result.paid_to(&AccountId::new("rec2")), 60);
}

/// Plans serialize with tagged transfers.
#[test]
fn result_serializes() {
    let closing = vec![ClosingAccount::new("acc1", 500)];
    let recipients = vec![RecipientAccount::new("rec1", 400)];

    let result = rebalance(&closing, &recipients).unwrap();
    let json = serde_json::to_string_pretty(&result).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed["operational_fee"], 20);
    assert!(parsed.get("plan_id").is_some());
    assert_eq!(parsed["transfers"][0]["kind"], "payment");
    assert_eq!(parsed["transfers"][1]["kind"], "leftover");
    assert_eq!(parsed["transfers"][1]["amount"], 80);
}

/// Accounts load from the CLI's JSON shape.
#[test]
fn accounts_deserialize_from_json() {
    let closing: Vec<ClosingAccount> =
        serde_json::from_str(r#"[{ "account_id": "acc1", "amount": 500 }]"#).unwrap();
    let recipients: Vec<RecipientAccount> =
        serde_json::from_str(r#"[{ "account_id": "rec1", "credit": 400 }]"#).unwrap();

    assert_eq!(closing, vec![ClosingAccount::new("acc1", 500)]);
    assert_eq!(recipients, vec![RecipientAccount::new("rec1", 400)]);
}

/// Each run gets its own plan identifier.
#[test]
fn plan_ids_are_unique() {
    let closing = vec![ClosingAccount::new("acc1", 500)];
    let recipients = vec![RecipientAccount::new("rec1", 400)];

    let a = rebalance(&closing, &recipients).unwrap();
    let b = rebalance(&closing, &recipients).unwrap();
    assert_ne!(a.plan_id(), b.plan_id());
    assert_eq!(a.transfers(), b.transfers());
}

/// Recipients with nothing owed are skipped; an empty closing account is still charged.
#[test]
fn zero_balances_flow_through_plan() {
    let closing = vec![
        ClosingAccount::new("acc0", 0),
        ClosingAccount::new("acc1", 200),
    ];
    let recipients = vec![
        RecipientAccount::new("rec0", 0),
        RecipientAccount::new("rec1", 50),
    ];

    let result = rebalance(&closing, &recipients).unwrap();

    // (acc0, rec1, 0), (acc1, rec1, 50), leftover (acc1, 150)
    assert_eq!(result.charged_entries(), 3);
    assert_eq!(result.operational_fee(), 30);
    assert_eq!(
        result.transfers(),
        &[
            Transfer::payment("acc1", "rec1", 50),
            Transfer::leftover("acc1", 120),
        ]
    );
    assert_eq!(result.paid_to(&AccountId::new("rec0")), 0);
    assert_eq!(result.total_transferred() + result.operational_fee(), 200);
}
