//! Invoice tools over the Chinook database.
//!
//! Every tool is scoped to one customer. The id comes from the `customer_id` argument or,
//! when omitted, from the verified customer forwarded in [`ToolCallContext`]. A model-supplied
//! id that disagrees with the verified one is rejected.

use async_trait::async_trait;
use rusqlite::types::Value as SqlValue;
use serde_json::{json, Value};

use crate::tool_source::{ToolCallContent, ToolCallContext, ToolSourceError, ToolSpec};
use crate::tools::{AggregateToolSource, Tool};

use super::db::ChinookDb;
use super::{rows_content, spec};

pub const TOOL_INVOICES_BY_DATE: &str = "get_invoices_by_customer_sorted_by_date";
pub const TOOL_INVOICES_BY_UNIT_PRICE: &str = "get_invoices_sorted_by_unit_price";
pub const TOOL_EMPLOYEE_BY_INVOICE: &str = "get_employee_by_invoice_and_customer";

/// Reads an id that the model may send as a number or a string.
fn id_arg(args: &Value, key: &str) -> Option<i64> {
    match args.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Resolves the customer a call is about.
pub(crate) fn resolve_customer_id(
    args: &Value,
    ctx: Option<&ToolCallContext>,
) -> Result<i64, ToolSourceError> {
    let from_args = match args.get("customer_id") {
        None | Some(Value::Null) => None,
        Some(_) => Some(id_arg(args, "customer_id").ok_or_else(|| {
            ToolSourceError::InvalidInput("customer_id must be an integer".into())
        })?),
    };
    let verified = ctx
        .and_then(|c| c.customer_id.as_deref())
        .and_then(|s| s.trim().parse::<i64>().ok());
    match (from_args, verified) {
        (Some(a), Some(v)) if a != v => Err(ToolSourceError::InvalidInput(format!(
            "customer_id {} does not match the verified customer",
            a
        ))),
        (Some(a), _) => Ok(a),
        (None, Some(v)) => Ok(v),
        (None, None) => Err(ToolSourceError::InvalidInput(
            "missing customer_id and no verified customer".into(),
        )),
    }
}

fn customer_schema(extra: Option<(&str, Value)>) -> Value {
    let mut properties = serde_json::Map::new();
    properties.insert(
        "customer_id".into(),
        json!({"type": "integer", "description": "Customer id; defaults to the verified customer"}),
    );
    let mut required = Vec::new();
    if let Some((name, schema)) = extra {
        properties.insert(name.to_string(), schema);
        required.push(name.to_string());
    }
    json!({"type": "object", "properties": properties, "required": required})
}

/// A customer's invoices, newest first.
pub struct InvoicesByDateTool {
    db: ChinookDb,
}

impl InvoicesByDateTool {
    pub fn new(db: ChinookDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Tool for InvoicesByDateTool {
    fn name(&self) -> &str {
        TOOL_INVOICES_BY_DATE
    }

    fn spec(&self) -> ToolSpec {
        spec(
            TOOL_INVOICES_BY_DATE,
            "Look up all invoices for a customer, most recent first.",
            customer_schema(None),
        )
    }

    async fn call(
        &self,
        args: Value,
        ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let customer_id = resolve_customer_id(&args, ctx)?;
        let rows = self
            .db
            .query(
                "SELECT * FROM Invoice WHERE CustomerId = ?1 ORDER BY InvoiceDate DESC",
                vec![SqlValue::Integer(customer_id)],
            )
            .await
            .map_err(|e| ToolSourceError::Execution(e.to_string()))?;
        Ok(rows_content(
            rows,
            &format!("No invoices found for customer {}.", customer_id),
        ))
    }
}

/// A customer's invoice lines, most expensive unit price first.
pub struct InvoicesByUnitPriceTool {
    db: ChinookDb,
}

impl InvoicesByUnitPriceTool {
    pub fn new(db: ChinookDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Tool for InvoicesByUnitPriceTool {
    fn name(&self) -> &str {
        TOOL_INVOICES_BY_UNIT_PRICE
    }

    fn spec(&self) -> ToolSpec {
        spec(
            TOOL_INVOICES_BY_UNIT_PRICE,
            "Look up a customer's invoices sorted by the unit price of their items, highest first.",
            customer_schema(None),
        )
    }

    async fn call(
        &self,
        args: Value,
        ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let customer_id = resolve_customer_id(&args, ctx)?;
        let rows = self
            .db
            .query(
                "SELECT Invoice.*, InvoiceLine.UnitPrice \
                 FROM Invoice JOIN InvoiceLine ON Invoice.InvoiceId = InvoiceLine.InvoiceId \
                 WHERE Invoice.CustomerId = ?1 \
                 ORDER BY InvoiceLine.UnitPrice DESC, Invoice.InvoiceDate DESC",
                vec![SqlValue::Integer(customer_id)],
            )
            .await
            .map_err(|e| ToolSourceError::Execution(e.to_string()))?;
        Ok(rows_content(
            rows,
            &format!("No invoices found for customer {}.", customer_id),
        ))
    }
}

/// The support employee attached to a customer's invoice.
pub struct EmployeeByInvoiceTool {
    db: ChinookDb,
}

impl EmployeeByInvoiceTool {
    pub fn new(db: ChinookDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Tool for EmployeeByInvoiceTool {
    fn name(&self) -> &str {
        TOOL_EMPLOYEE_BY_INVOICE
    }

    fn spec(&self) -> ToolSpec {
        spec(
            TOOL_EMPLOYEE_BY_INVOICE,
            "Get the employee who supports the customer on a given invoice.",
            customer_schema(Some(("invoice_id", json!({"type": "integer"})))),
        )
    }

    async fn call(
        &self,
        args: Value,
        ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let invoice_id = id_arg(&args, "invoice_id")
            .ok_or_else(|| ToolSourceError::InvalidInput("missing invoice_id".into()))?;
        let customer_id = resolve_customer_id(&args, ctx)?;
        let rows = self
            .db
            .query(
                "SELECT Employee.FirstName, Employee.Title, Employee.Email \
                 FROM Employee \
                 JOIN Customer ON Customer.SupportRepId = Employee.EmployeeId \
                 JOIN Invoice ON Invoice.CustomerId = Customer.CustomerId \
                 WHERE Invoice.InvoiceId = ?1 AND Invoice.CustomerId = ?2",
                vec![SqlValue::Integer(invoice_id), SqlValue::Integer(customer_id)],
            )
            .await
            .map_err(|e| ToolSourceError::Execution(e.to_string()))?;
        Ok(rows_content(
            rows,
            &format!(
                "No employee found for invoice ID {} and customer identifier {}.",
                invoice_id, customer_id
            ),
        ))
    }
}

/// Tool source with the three invoice tools.
pub fn invoice_tools(db: &ChinookDb) -> AggregateToolSource {
    AggregateToolSource::new()
        .with_tool(Box::new(InvoicesByDateTool::new(db.clone())))
        .with_tool(Box::new(InvoicesByUnitPriceTool::new(db.clone())))
        .with_tool(Box::new(EmployeeByInvoiceTool::new(db.clone())))
}
