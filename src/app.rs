//! The stateful form controller sitting between the front-end and the
//! storage engine.
//!
//! [App] owns a snapshot of the data being displayed (transactions,
//! categories, summary) and the id of the transaction currently being edited,
//! mirroring the state a form holds between user actions. Every mutation goes
//! through validation, hits the store, and then reloads the snapshot so the
//! front-end always renders what is actually persisted.

use std::sync::MutexGuard;

use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    category::{Category, CategoryKind, create_category, delete_category, get_all_categories},
    database_id::{CategoryId, TransactionId},
    form::{
        CategoryFormData, TransactionFormData, validate_category_form, validate_transaction_form,
    },
    summary::{Summary, get_summary},
    transaction::{
        Transaction, create_transaction, delete_transaction, get_all_transactions,
        update_transaction,
    },
};

/// The form controller: validates user input, maps it to storage calls, and
/// reloads the displayed data after each mutation.
#[derive(Debug)]
pub struct App {
    state: AppState,
    editing_transaction_id: Option<TransactionId>,
    transactions: Vec<Transaction>,
    categories: Vec<Category>,
    summary: Summary,
}

impl App {
    /// Create the controller and load the initial snapshot.
    ///
    /// # Errors
    /// Returns an error if the initial load fails.
    pub fn new(state: AppState) -> Result<Self, Error> {
        let mut app = Self {
            state,
            editing_transaction_id: None,
            transactions: Vec::new(),
            categories: Vec::new(),
            summary: Summary {
                total_income: 0.0,
                total_expenses: 0.0,
                balance: 0.0,
            },
        };

        app.refresh()?;
        tracing::info!("application started");

        Ok(app)
    }

    fn connection(&self) -> MutexGuard<'_, Connection> {
        self.state
            .db_connection
            .lock()
            .expect("database connection lock poisoned")
    }

    /// Reload transactions, categories and the summary from the store.
    ///
    /// # Errors
    /// Returns an error if any of the reads fail; the previous snapshot is
    /// kept in that case.
    pub fn refresh(&mut self) -> Result<(), Error> {
        let connection = self.connection();
        let transactions = get_all_transactions(&connection)?;
        let categories = get_all_categories(&connection)?;
        let summary = get_summary(&connection)?;
        drop(connection);

        self.transactions = transactions;
        self.categories = categories;
        self.summary = summary;

        Ok(())
    }

    /// The loaded transactions, most recent date first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// The loaded categories, in insertion order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// The loaded income/expense/balance summary.
    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    /// The id of the transaction currently being edited, if any.
    pub fn editing(&self) -> Option<TransactionId> {
        self.editing_transaction_id
    }

    /// Validate `form` and either add a new transaction or, when an edit is
    /// in progress, replace the fields of the edited one.
    ///
    /// The edit state is cleared only on success, so a failed submission can
    /// be corrected and resubmitted without selecting the transaction again.
    ///
    /// # Errors
    /// Returns a validation error from
    /// [validate_transaction_form][crate::validate_transaction_form], or an
    /// [Error::SqlError] if the write fails. Nothing is persisted on error.
    pub fn submit_transaction(&mut self, form: &TransactionFormData) -> Result<TransactionId, Error> {
        let valid = validate_transaction_form(form, &self.categories)?;
        let builder =
            Transaction::build(valid.amount, valid.date, valid.category).notes(&valid.notes);

        let id = match self.editing_transaction_id {
            Some(id) => {
                let connection = self.connection();
                update_transaction(id, builder, &connection)?;
                drop(connection);

                self.editing_transaction_id = None;
                tracing::info!("updated transaction {id}");
                id
            }
            None => {
                let connection = self.connection();
                let transaction = create_transaction(builder, &connection)?;
                drop(connection);

                tracing::info!("added transaction {}", transaction.id);
                transaction.id
            }
        };

        self.refresh()?;

        Ok(id)
    }

    /// Mark the transaction with `id` as being edited and return it so the
    /// front-end can prefill the form.
    ///
    /// The lookup is keyed by id against the loaded snapshot, never by
    /// matching displayed text.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if `id` is not in the loaded snapshot.
    pub fn begin_edit(&mut self, id: TransactionId) -> Result<&Transaction, Error> {
        let index = self
            .transactions
            .iter()
            .position(|transaction| transaction.id == id)
            .ok_or(Error::NotFound)?;

        self.editing_transaction_id = Some(id);
        tracing::info!("editing transaction {id}");

        Ok(&self.transactions[index])
    }

    /// Abandon the edit in progress, if any.
    pub fn cancel_edit(&mut self) {
        self.editing_transaction_id = None;
    }

    /// Delete the transaction with `id` and reload the snapshot.
    ///
    /// The front-end is expected to have confirmed the action with the user
    /// before calling this. Deleting an id that no longer exists is a no-op.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the delete or the reload fails.
    pub fn delete_transaction(&mut self, id: TransactionId) -> Result<(), Error> {
        let connection = self.connection();
        delete_transaction(id, &connection)?;
        drop(connection);

        if self.editing_transaction_id == Some(id) {
            self.editing_transaction_id = None;
        }

        tracing::info!("deleted transaction {id}");
        self.refresh()
    }

    /// Validate `form`, create the category, and reload the snapshot.
    ///
    /// # Errors
    /// Returns a validation error from
    /// [validate_category_form][crate::validate_category_form], or an
    /// [Error::SqlError] if the write fails.
    pub fn add_category(&mut self, form: &CategoryFormData) -> Result<CategoryId, Error> {
        let valid = validate_category_form(form)?;

        let connection = self.connection();
        let category = create_category(valid.name, valid.kind, &valid.icon, &connection)?;
        drop(connection);

        tracing::info!("added category {} ({})", category.id, category.name);
        self.refresh()?;

        Ok(category.id)
    }

    /// Delete the category with `id` and reload the snapshot.
    ///
    /// Transactions referencing the category by name are left as they are;
    /// the front-end is expected to have confirmed the action with the user.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the delete or the reload fails.
    pub fn delete_category(&mut self, id: CategoryId) -> Result<(), Error> {
        let connection = self.connection();
        delete_category(id, &connection)?;
        drop(connection);

        tracing::info!("deleted category {id}");
        self.refresh()
    }

    /// The loaded categories in display order: income categories first, then
    /// expense categories, each group sorted by name.
    ///
    /// The store returns categories in insertion order; this grouping is a
    /// presentation concern and deliberately lives here rather than in the
    /// category queries.
    pub fn categories_for_display(&self) -> Vec<&Category> {
        let kind_order = |category: &Category| match category.kind {
            CategoryKind::Income => 0,
            CategoryKind::Expense => 1,
        };

        let mut categories: Vec<&Category> = self.categories.iter().collect();
        categories.sort_by(|a, b| {
            kind_order(a)
                .cmp(&kind_order(b))
                .then_with(|| a.name.as_ref().cmp(b.name.as_ref()))
        });

        categories
    }

    /// Filter the loaded transactions by keyword and/or inclusive date range.
    ///
    /// The keyword matches case-insensitively against the category name and
    /// the notes. A `None` for any argument leaves that dimension
    /// unconstrained. Purely in-memory over the loaded snapshot; the store is
    /// not consulted.
    pub fn filter_transactions(
        &self,
        keyword: Option<&str>,
        from: Option<Date>,
        to: Option<Date>,
    ) -> Vec<&Transaction> {
        let keyword = keyword.map(str::to_lowercase);

        self.transactions
            .iter()
            .filter(|transaction| {
                let keyword_matches = keyword.as_deref().is_none_or(|keyword| {
                    transaction.category.as_ref().to_lowercase().contains(keyword)
                        || transaction.notes.to_lowercase().contains(keyword)
                });
                let after_from = from.is_none_or(|from| transaction.date >= from);
                let before_to = to.is_none_or(|to| transaction.date <= to);

                keyword_matches && after_from && before_to
            })
            .collect()
    }
}

#[cfg(test)]
mod app_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        AppState, Error,
        category::CategoryName,
        form::{CategoryFormData, TransactionFormData},
    };

    use super::App;

    fn get_test_app() -> App {
        let connection = Connection::open_in_memory().unwrap();
        let state = AppState::new(connection).unwrap();
        let mut app = App::new(state).unwrap();

        for (name, kind) in [
            ("Salary", "Income"),
            ("Groceries", "Expense"),
            ("Rent", "Expense"),
        ] {
            app.add_category(&CategoryFormData {
                name: name.to_string(),
                kind: kind.to_string(),
                icon: String::new(),
            })
            .expect("could not seed category");
        }

        app
    }

    fn groceries_form() -> TransactionFormData {
        TransactionFormData {
            date: "2024-01-10".to_string(),
            category: "Groceries".to_string(),
            amount: "1200".to_string(),
            notes: "weekly".to_string(),
        }
    }

    #[test]
    fn submit_adds_transaction_and_updates_summary() {
        let mut app = get_test_app();

        let id = app.submit_transaction(&groceries_form()).unwrap();
        app.submit_transaction(&TransactionFormData {
            date: "2024-01-05".to_string(),
            category: "Salary".to_string(),
            amount: "50000".to_string(),
            notes: String::new(),
        })
        .unwrap();

        assert!(id > 0);
        assert_eq!(app.transactions().len(), 2);
        // Date-descending: the groceries row comes first.
        assert_eq!(
            app.transactions()[0].category,
            CategoryName::new_unchecked("Groceries")
        );
        assert_eq!(app.summary().total_income, 50_000.0);
        assert_eq!(app.summary().total_expenses, 1200.0);
        assert_eq!(app.summary().balance, 48_800.0);
    }

    #[test]
    fn submit_with_unknown_category_persists_nothing() {
        let mut app = get_test_app();
        let mut form = groceries_form();
        form.category = "Yachts".to_string();

        let result = app.submit_transaction(&form);

        assert_eq!(result, Err(Error::UnknownCategory("Yachts".to_string())));
        assert!(app.transactions().is_empty());
    }

    #[test]
    fn begin_edit_then_submit_updates_in_place() {
        let mut app = get_test_app();
        let id = app.submit_transaction(&groceries_form()).unwrap();

        let edited = app.begin_edit(id).unwrap();
        assert_eq!(edited.amount, 1200.0);
        assert_eq!(app.editing(), Some(id));

        let updated_id = app
            .submit_transaction(&TransactionFormData {
                date: "2024-01-11".to_string(),
                category: "Rent".to_string(),
                amount: "950".to_string(),
                notes: "january".to_string(),
            })
            .unwrap();

        assert_eq!(updated_id, id);
        assert_eq!(app.editing(), None);
        assert_eq!(app.transactions().len(), 1);
        let transaction = &app.transactions()[0];
        assert_eq!(transaction.id, id);
        assert_eq!(transaction.date, date!(2024 - 01 - 11));
        assert_eq!(transaction.category, CategoryName::new_unchecked("Rent"));
        assert_eq!(transaction.amount, 950.0);
        assert_eq!(transaction.notes, "january");
    }

    #[test]
    fn failed_submission_keeps_edit_state() {
        let mut app = get_test_app();
        let id = app.submit_transaction(&groceries_form()).unwrap();
        app.begin_edit(id).unwrap();

        let mut bad_form = groceries_form();
        bad_form.amount = "-5".to_string();
        let result = app.submit_transaction(&bad_form);

        assert_eq!(result, Err(Error::NonPositiveAmount(-5.0)));
        // The edit is still in progress and the stored row is unchanged.
        assert_eq!(app.editing(), Some(id));
        assert_eq!(app.transactions()[0].amount, 1200.0);
    }

    #[test]
    fn begin_edit_with_unknown_id_returns_not_found() {
        let mut app = get_test_app();

        let result = app.begin_edit(1337);

        assert!(matches!(result, Err(Error::NotFound)));
        assert_eq!(app.editing(), None);
    }

    #[test]
    fn delete_transaction_clears_matching_edit_state() {
        let mut app = get_test_app();
        let id = app.submit_transaction(&groceries_form()).unwrap();
        app.begin_edit(id).unwrap();

        app.delete_transaction(id).unwrap();

        assert_eq!(app.editing(), None);
        assert!(app.transactions().is_empty());
        assert_eq!(app.summary().total_expenses, 0.0);
    }

    #[test]
    fn categories_for_display_orders_income_then_expense_by_name() {
        let app = get_test_app();

        let names: Vec<&str> = app
            .categories_for_display()
            .iter()
            .map(|category| category.name.as_ref())
            .collect();

        assert_eq!(names, vec!["Salary", "Groceries", "Rent"]);
    }

    #[test]
    fn delete_category_leaves_transactions_untouched() {
        let mut app = get_test_app();
        app.submit_transaction(&groceries_form()).unwrap();
        let groceries_id = app
            .categories()
            .iter()
            .find(|category| category.name.as_ref() == "Groceries")
            .unwrap()
            .id;

        app.delete_category(groceries_id).unwrap();

        assert_eq!(app.transactions().len(), 1);
        // Classification goes by name, so the summary is stable too.
        assert_eq!(app.summary().total_expenses, 1200.0);
    }

    #[test]
    fn filter_by_keyword_matches_category_and_notes() {
        let mut app = get_test_app();
        app.submit_transaction(&groceries_form()).unwrap();
        app.submit_transaction(&TransactionFormData {
            date: "2024-01-05".to_string(),
            category: "Salary".to_string(),
            amount: "50000".to_string(),
            notes: "january pay".to_string(),
        })
        .unwrap();

        let by_category = app.filter_transactions(Some("grocer"), None, None);
        let by_notes = app.filter_transactions(Some("PAY"), None, None);
        let no_match = app.filter_transactions(Some("yacht"), None, None);

        assert_eq!(by_category.len(), 1);
        assert_eq!(
            by_category[0].category,
            CategoryName::new_unchecked("Groceries")
        );
        assert_eq!(by_notes.len(), 1);
        assert_eq!(by_notes[0].category, CategoryName::new_unchecked("Salary"));
        assert!(no_match.is_empty());
    }

    #[test]
    fn filter_by_date_range_is_inclusive() {
        let mut app = get_test_app();
        app.submit_transaction(&groceries_form()).unwrap(); // 2024-01-10
        app.submit_transaction(&TransactionFormData {
            date: "2024-01-05".to_string(),
            category: "Salary".to_string(),
            amount: "50000".to_string(),
            notes: String::new(),
        })
        .unwrap();

        let from_only = app.filter_transactions(None, Some(date!(2024 - 01 - 06)), None);
        let inclusive_bounds = app.filter_transactions(
            None,
            Some(date!(2024 - 01 - 05)),
            Some(date!(2024 - 01 - 10)),
        );
        let narrow = app.filter_transactions(
            None,
            Some(date!(2024 - 01 - 06)),
            Some(date!(2024 - 01 - 09)),
        );

        assert_eq!(from_only.len(), 1);
        assert_eq!(inclusive_bounds.len(), 2);
        assert!(narrow.is_empty());
    }
}
