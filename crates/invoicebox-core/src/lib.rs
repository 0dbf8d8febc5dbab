//! Core payload models for the Invoicebox API.
//!
//! This crate provides the validated models that are sent as request bodies
//! through the Invoicebox client:
//!
//! - **Customer**: `Customer`, `CustomerType`, `CustomerInput`
//!
//! # Customer lifecycle
//!
//! A `Customer` is built field by field. Every setter validates its own
//! field immediately; the conditional required-field contract is only
//! checked when the payload is produced with [`Customer::form_data`].
//!
//! ```
//! use invoicebox_core::{Customer, CustomerType};
//!
//! # fn example() -> invoicebox_core::Result<()> {
//! let mut customer = Customer::new();
//! customer.set_type("legal")?;
//! customer.set_name("ООО Ромашка")?;
//! customer.set_phone("+79990000000")?;
//! customer.set_email("billing@romashka.ru")?;
//! customer.set_inn("7700000000")?;
//! customer.set_address("Москва, ул. Тверская, 1")?;
//!
//! assert_eq!(customer.customer_type(), Some(CustomerType::LegalPerson));
//! let payload = customer.form_data()?;
//! assert_eq!(payload.len(), 6);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod customer;
pub mod error;

pub use customer::{
    Customer, CustomerInput, CustomerType, FormData, MAX_ADDRESS_LEN, MAX_EMAIL_LEN,
    MAX_INN_LEN, MAX_NAME_LEN, MAX_PHONE_LEN,
};
pub use error::{CustomerError, Result};
