//! Customer records

use seedbook_core::Customer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RecordError, RecordResult};
use crate::fields::{self, json_type_name, read_string, read_timestamp, write_timestamp};

/// A customer as written to the document store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    pub name: String,
    pub phone: String,
    pub notes: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl CustomerRecord {
    pub fn to_document(&self) -> RecordResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

pub fn encode_customer(customer: &Customer) -> CustomerRecord {
    CustomerRecord {
        name: customer.name().to_string(),
        phone: customer.phone().to_string(),
        notes: customer.notes().to_string(),
        created_at: write_timestamp(customer.created_at()),
        updated_at: write_timestamp(customer.updated_at()),
    }
}

/// Rebuild a customer from a stored document; missing text fields read as empty
pub fn decode_customer(id: Option<&str>, document: &Value) -> RecordResult<Customer> {
    let map = document
        .as_object()
        .ok_or_else(|| RecordError::NotAnObject(json_type_name(document)))?;

    Ok(Customer::from_parts(
        id.map(str::to_string),
        read_string(map, fields::NAME).unwrap_or_default(),
        read_string(map, fields::PHONE).unwrap_or_default(),
        read_string(map, fields::NOTES).unwrap_or_default(),
        read_timestamp(map, fields::CREATED_AT).resolve(),
        read_timestamp(map, fields::UPDATED_AT).resolve(),
    ))
}
