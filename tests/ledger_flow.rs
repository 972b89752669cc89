mod common;

use common::{moment, month, setup_app};
use expense_core::{
    errors::LedgerError,
    ledger::{BudgetBand, DebtDirection, SortKey, Transaction, TransactionPatch},
};

#[test]
fn month_total_and_rollover_carry_recurring_only() {
    let (mut app, _guard) = setup_app(month(2024, 1));
    let jan = moment(2024, 1, 5, 9, 0);
    app.add_transaction(Transaction::at(jan, "Groceries", 10.0, "Food").with_recurring(true))
        .unwrap();
    app.add_transaction(Transaction::at(jan, "Phone", 20.0, "Bills"))
        .unwrap();
    assert_eq!(app.active_total(), 30.0);

    let rolled_at = moment(2024, 2, 1, 7, 45);
    let rollover = app.start_next_month_at(rolled_at).unwrap();
    assert_eq!(rollover.month.to_string(), "2024-2");
    assert_eq!(rollover.carried, 1);

    let feb = app.ledger().transactions(month(2024, 2));
    assert_eq!(feb.len(), 1);
    assert_eq!(feb[0].category, "Food");
    assert_eq!(feb[0].amount, 10.0);
    assert_eq!(feb[0].date, rolled_at.date());
    assert!(feb[0].recurring);

    // The source month is left as it was.
    assert_eq!(app.ledger().month_total(month(2024, 1)), 30.0);
}

#[test]
fn december_rolls_into_january() {
    let (mut app, _guard) = setup_app(month(2023, 12));
    app.add_transaction(
        Transaction::at(moment(2023, 12, 1, 8, 0), "Rent", 800.0, "Bills").with_recurring(true),
    )
    .unwrap();
    let rollover = app.start_next_month_at(moment(2024, 1, 1, 0, 5)).unwrap();
    assert_eq!(rollover.month, month(2024, 1));
    assert_eq!(app.active_month(), month(2024, 1));
}

#[test]
fn rollover_without_recurring_creates_empty_month() {
    let (mut app, _guard) = setup_app(month(2024, 3));
    app.quick_add("Food", 4.0, moment(2024, 3, 2, 12, 0)).unwrap();
    let rollover = app.start_next_month_at(moment(2024, 4, 1, 9, 0)).unwrap();
    assert_eq!(rollover.carried, 0);
    assert!(app.ledger().contains_month(month(2024, 4)));
    assert_eq!(app.active_total(), 0.0);
}

#[test]
fn sorted_view_never_reorders_storage() {
    let (mut app, _guard) = setup_app(month(2024, 5));
    let entries = [
        ("Taxi", 18.0, "Transport", 3),
        ("Lunch", 12.0, "Food", 1),
        ("Cinema", 18.0, "Entertainment", 2),
    ];
    for (description, amount, category, day) in entries {
        app.add_transaction(Transaction::at(
            moment(2024, 5, day, 12, 0),
            description,
            amount,
            category,
        ))
        .unwrap();
    }

    let by_amount: Vec<usize> = app
        .sorted_transactions(SortKey::AmountDesc)
        .iter()
        .map(|(index, _)| index)
        .collect();
    // Equal amounts keep storage order.
    assert_eq!(by_amount, vec![0, 2, 1]);

    let by_date: Vec<&str> = app
        .sorted_transactions(SortKey::DateAsc)
        .transactions()
        .map(|txn| txn.description.as_str())
        .collect();
    assert_eq!(by_date, vec!["Lunch", "Cinema", "Taxi"]);

    let stored: Vec<&str> = app
        .ledger()
        .transactions(month(2024, 5))
        .iter()
        .map(|txn| txn.description.as_str())
        .collect();
    assert_eq!(stored, vec!["Taxi", "Lunch", "Cinema"]);
}

#[test]
fn edit_and_delete_report_out_of_range() {
    let (mut app, _guard) = setup_app(month(2024, 6));
    app.quick_add("Other", 1.0, moment(2024, 6, 1, 10, 0)).unwrap();

    let err = app
        .edit_transaction(3, &TransactionPatch::new().amount(2.0))
        .unwrap_err();
    assert!(matches!(err, LedgerError::IndexOutOfRange { index: 3, len: 1 }));

    let err = app.delete_transaction(1).unwrap_err();
    assert!(matches!(err, LedgerError::IndexOutOfRange { .. }));

    let updated = app
        .edit_transaction(0, &TransactionPatch::new().description("Stamps"))
        .unwrap();
    assert_eq!(updated.description, "Stamps");
    assert_eq!(updated.amount, 1.0);
}

#[test]
fn budget_bands_follow_spending() {
    let cases = [(95.0, BudgetBand::Danger), (80.0, BudgetBand::Warning), (50.0, BudgetBand::Normal)];
    for (spent, band) in cases {
        let (mut app, _guard) = setup_app(month(2024, 7));
        app.set_budget("Food", 100.0).unwrap();
        app.quick_add("Food", spent, moment(2024, 7, 4, 13, 0)).unwrap();
        let status = app.budget_status("Food").unwrap();
        assert_eq!(status.band, band, "spent {spent}");
        assert_eq!(status.remaining, Some(100.0 - spent));
    }
}

#[test]
fn non_positive_budget_limits_are_rejected() {
    let (mut app, _guard) = setup_app(month(2024, 7));
    for limit in [0.0, -5.0, f64::INFINITY] {
        let err = app.set_budget("Food", limit).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));
    }
    assert!(app.budgets().is_empty());
}

#[test]
fn splits_and_debts() {
    let (mut app, _guard) = setup_app(month(2024, 8));
    let split = app.add_split("Dinner", 90.0, "Alice, Bob, Carol").unwrap();
    assert_eq!(split.each, 30.0);
    assert_eq!(split.participants, vec!["Alice", "Bob", "Carol"]);

    let err = app.add_split("Nobody", 10.0, " , ,").unwrap_err();
    assert!(matches!(err, LedgerError::InvalidInput(_)));

    app.add_debt("Concert", 45.0, DebtDirection::OwedToMe).unwrap();
    app.add_debt("Book", 15.0, DebtDirection::OwedByMe).unwrap();
    let totals = app.debt_totals();
    assert_eq!(totals.owed_to_me, 45.0);
    assert_eq!(totals.owed_by_me, 15.0);
    assert_eq!(totals.net(), 30.0);
}
