//! Typed views over inventory records for stock diagnostics.
//!
//! Inventory items cache a `totalStock` aggregate next to a batch ledger.
//! The invariant is `totalStock == sum(batches[].quantity)` with
//! `totalStock >= 0`; a violation is a data-integrity defect, never a
//! transient state. [`StockLedger`] parses one item record (fetched with its
//! batches) into the numbers the integrity pass compares.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{RecordId, TenantId};
use crate::kind::EntityKind;
use crate::record::Record;

/// One batch ledger entry contributing quantity to an item's total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    /// The batch row id, when the store materializes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Units this batch contributes to the item total.
    pub quantity: i64,
    /// Expiry date, when tracked for the product.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// The stock numbers of one inventory item: cached total plus batch ledger.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use vetra_model::{EntityKind, Record, StockLedger, TenantId};
///
/// let item = Record::new(
///     EntityKind::InventoryItem,
///     "itm-1",
///     TenantId::new("clinic-a"),
///     json!({
///         "name": "Carprofen 50mg",
///         "totalStock": 10,
///         "batches": [{ "quantity": 4 }, { "quantity": 6 }],
///     }),
/// );
///
/// let ledger = StockLedger::from_record(&item).unwrap();
/// assert_eq!(ledger.batch_sum(), 10);
/// assert!(ledger.is_consistent());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StockLedger {
    /// The inventory item row id.
    pub item_id: RecordId,
    /// The tenant owning the item.
    pub tenant_id: TenantId,
    /// Product name, when present on the row.
    pub name: Option<String>,
    /// The cached stock total stored on the item row.
    pub total_stock: i64,
    /// The batch ledger. Empty when the item has no batches.
    pub batches: Vec<Batch>,
}

impl StockLedger {
    /// Parses an inventory item record into its stock ledger view.
    ///
    /// The record must be an [`EntityKind::InventoryItem`] fetched with its
    /// batches loaded; a missing `batches` field reads as an empty ledger.
    /// Returns an error for non-inventory records, a missing or non-integer
    /// `totalStock`, or a batch entry without an integer `quantity`.
    pub fn from_record(record: &Record) -> Result<Self, String> {
        if record.kind() != EntityKind::InventoryItem {
            return Err(format!(
                "expected an inventoryItem record, got {}",
                record.kind()
            ));
        }
        let total_stock = record.field_i64("totalStock").ok_or_else(|| {
            format!("inventory item {} has no integer totalStock", record.id())
        })?;
        let batches = match record.field("batches") {
            Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
                format!("inventory item {} has a malformed batch ledger: {}", record.id(), e)
            })?,
            None => Vec::new(),
        };
        Ok(Self {
            item_id: record.id().clone(),
            tenant_id: record.tenant_id().clone(),
            name: record.field_str("name").map(str::to_owned),
            total_stock,
            batches,
        })
    }

    /// The sum of the batch ledger quantities.
    ///
    /// Saturates at the `i64` bounds so a pathological ledger reads as an
    /// extreme sum instead of a wrapped one.
    pub fn batch_sum(&self) -> i64 {
        self.batches
            .iter()
            .fold(0i64, |sum, batch| sum.saturating_add(batch.quantity))
    }

    /// Returns `true` when the cached total matches the ledger and is
    /// non-negative.
    pub fn is_consistent(&self) -> bool {
        self.total_stock == self.batch_sum() && self.total_stock >= 0
    }
}
