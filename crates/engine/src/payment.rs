use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Payment method attached to a sale.
///
/// The set is closed: routes and storage only ever see these five values,
/// stored as their uppercase Portuguese labels.
///
/// Two of them drive special flows:
/// - `Dinheiro` (cash) stays with the deliveryman until deposited.
/// - `Fiado` (on credit) accrues on the customer's credit balance until
///   settled.
///
/// Every other method settles through a configured bank account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    Dinheiro,
    Pix,
    Cartao,
    Transferencia,
    Fiado,
}

impl PaymentMethod {
    /// Canonical stored label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Dinheiro => "DINHEIRO",
            PaymentMethod::Pix => "PIX",
            PaymentMethod::Cartao => "CARTAO",
            PaymentMethod::Transferencia => "TRANSFERENCIA",
            PaymentMethod::Fiado => "FIADO",
        }
    }

    /// Physical cash held by the deliveryman.
    #[must_use]
    pub const fn is_cash(self) -> bool {
        matches!(self, PaymentMethod::Dinheiro)
    }

    /// Sold on credit, settled later against the customer balance.
    #[must_use]
    pub const fn is_on_credit(self) -> bool {
        matches!(self, PaymentMethod::Fiado)
    }

    /// Whether the method needs a configured bank account to book against.
    #[must_use]
    pub const fn requires_bank_account(self) -> bool {
        !self.is_cash() && !self.is_on_credit()
    }
}

impl core::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for PaymentMethod {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "DINHEIRO" => Ok(PaymentMethod::Dinheiro),
            "PIX" => Ok(PaymentMethod::Pix),
            "CARTAO" => Ok(PaymentMethod::Cartao),
            "TRANSFERENCIA" => Ok(PaymentMethod::Transferencia),
            "FIADO" => Ok(PaymentMethod::Fiado),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid payment method: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip() {
        for method in [
            PaymentMethod::Dinheiro,
            PaymentMethod::Pix,
            PaymentMethod::Cartao,
            PaymentMethod::Transferencia,
            PaymentMethod::Fiado,
        ] {
            assert_eq!(PaymentMethod::try_from(method.as_str()), Ok(method));
        }
    }

    #[test]
    fn only_cash_and_credit_skip_the_bank_account() {
        assert!(!PaymentMethod::Dinheiro.requires_bank_account());
        assert!(!PaymentMethod::Fiado.requires_bank_account());
        assert!(PaymentMethod::Pix.requires_bank_account());
        assert!(PaymentMethod::Cartao.requires_bank_account());
        assert!(PaymentMethod::Transferencia.requires_bank_account());
    }
}
