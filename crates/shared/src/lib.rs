//! Armory Shared - Wire types for the inventory HTTP API
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde and serde_json
//! 2. **No business logic** - Pure data types and serialization
//! 3. **No domain IDs** - raw `i64` ids in DTOs; the engine converts them

pub mod requests;
pub mod responses;

pub use requests::{
    CharacterDiscardItemsRequest, DiscardItemsRequest, EquipItemsRequest, TransferItemsRequest,
};
pub use responses::{ApiResponse, ErrorCode, ErrorResponse};
