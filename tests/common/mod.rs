//! Common test utilities: an expense ledger record, in-memory host services
//! and a grid builder.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss
)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Wake, Waker};

use chrono::NaiveDate;
use ledgergrid::{
    CellValue, Clipboard, Column, ColumnKind, GridConfig, GridError, GridHost, LedgerGrid,
    LocalTask, Record, RowId, TaskSpawner,
};

// ============================================================================
// Record
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: u64,
    pub date: NaiveDate,
    pub vendor: String,
    pub amount: f64,
    pub note: String,
}

impl Record for Expense {
    fn id(&self) -> RowId {
        RowId::from(self.id)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn expense(id: u64, date: NaiveDate, vendor: &str, amount: f64) -> Expense {
    Expense {
        id,
        date,
        vendor: vendor.to_string(),
        amount,
        note: String::new(),
    }
}

/// `n` rows with ids `0..n`, vendor `Vendor {i}`, amount `i * 10`, one day
/// apart starting 2023-01-01.
pub fn expenses(n: u64) -> Vec<Expense> {
    let start = date(2023, 1, 1);
    (0..n)
        .map(|i| {
            expense(
                i,
                start + chrono::Duration::days(i as i64),
                &format!("Vendor {i}"),
                i as f64 * 10.0,
            )
        })
        .collect()
}

// Column indices of `expense_columns`.
pub const DATE: usize = 0;
pub const VENDOR: usize = 1;
pub const AMOUNT: usize = 2;
pub const NOTE: usize = 3;

// ============================================================================
// Host services
// ============================================================================

/// Collects spawned tasks; `run_all` polls them once.
#[derive(Default)]
pub struct QueueSpawner {
    tasks: RefCell<Vec<LocalTask>>,
}

struct NoopWake;

impl Wake for NoopWake {
    fn wake(self: Arc<Self>) {}
}

impl QueueSpawner {
    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Poll every queued task once. Returns how many completed.
    pub fn run_all(&self) -> usize {
        let waker = Waker::from(Arc::new(NoopWake));
        let mut cx = Context::from_waker(&waker);
        let tasks: Vec<LocalTask> = self.tasks.borrow_mut().drain(..).collect();
        let mut done = 0;
        for mut task in tasks {
            if task.as_mut().poll(&mut cx).is_ready() {
                done += 1;
            }
        }
        done
    }
}

impl TaskSpawner for QueueSpawner {
    fn spawn_local(&self, task: LocalTask) {
        self.tasks.borrow_mut().push(task);
    }
}

#[derive(Default)]
pub struct MemoryClipboard {
    pub writes: RefCell<Vec<String>>,
    pub fail: Cell<bool>,
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> ledgergrid::Result<()> {
        if self.fail.get() {
            return Err(GridError::Clipboard("permission denied".to_string()));
        }
        self.writes.borrow_mut().push(text.to_string());
        Ok(())
    }
}

// ============================================================================
// Grid builder
// ============================================================================

pub type SaveLog = Rc<RefCell<Vec<(RowId, CellValue)>>>;

/// Date, vendor (read-only), amount (currency, saves into `saves`) and note
/// (text, save always fails).
pub fn expense_columns(saves: &SaveLog) -> Vec<Column<Expense>> {
    let amount_saves = Rc::clone(saves);
    vec![
        Column::new("date", "Date", ColumnKind::Date, |e: &Expense| {
            CellValue::Date(e.date)
        }),
        Column::new("vendor", "Vendor", ColumnKind::Text, |e: &Expense| {
            CellValue::from(e.vendor.as_str())
        }),
        Column::new("amount", "Amount", ColumnKind::Currency, |e: &Expense| {
            CellValue::Number(e.amount)
        })
        .editable(move |id, value| {
            let saves = Rc::clone(&amount_saves);
            async move {
                saves.borrow_mut().push((id, value));
                Ok::<(), GridError>(())
            }
        }),
        Column::new("note", "Note", ColumnKind::Text, |e: &Expense| {
            CellValue::from(e.note.as_str())
        })
        .editable(|_id, _value| async { Err::<(), _>(GridError::Save("offline".to_string())) }),
    ]
}

pub struct Harness {
    pub grid: LedgerGrid<Expense>,
    pub spawner: Rc<QueueSpawner>,
    pub clipboard: Rc<MemoryClipboard>,
    pub saves: SaveLog,
}

impl Harness {
    pub fn new(rows: Vec<Expense>) -> Self {
        Self::with_config(rows, GridConfig::default())
    }

    pub fn with_config(rows: Vec<Expense>, config: GridConfig) -> Self {
        let spawner = Rc::new(QueueSpawner::default());
        let clipboard = Rc::new(MemoryClipboard::default());
        let saves: SaveLog = Rc::default();
        let host = GridHost {
            spawner: Rc::clone(&spawner) as Rc<dyn TaskSpawner>,
            clipboard: Rc::clone(&clipboard) as Rc<dyn Clipboard>,
        };
        let mut grid = LedgerGrid::new(expense_columns(&saves), config, host).unwrap();
        grid.set_rows(rows).unwrap();
        grid.on_resize(600.0, 0.0);
        grid.drain_events();
        Self {
            grid,
            spawner,
            clipboard,
            saves,
        }
    }

    /// Run queued saves and return everything saved so far.
    pub fn flush_saves(&self) -> Vec<(RowId, CellValue)> {
        self.spawner.run_all();
        self.saves.borrow().clone()
    }
}
