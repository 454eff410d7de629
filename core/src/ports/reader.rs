//! Token reader port (interface).

use crate::domain::TokenId;
use crate::error::Result;

/// Port for the identity-token reader (RFID or barcode).
pub trait TokenReaderPort: Send + Sync {
    /// Wait until a credential is presented and return its identifier.
    ///
    /// There is no timeout. An error means the reader itself failed.
    fn read_token(&self) -> impl std::future::Future<Output = Result<TokenId>> + Send;
}
