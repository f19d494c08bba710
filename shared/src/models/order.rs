//! Order status state machine and payment methods

use serde::{Deserialize, Serialize};

/// حالة الطلب — closed enum with an explicit transition table
///
/// The wire/storage form is the kebab-case string (`waiting-for-driver`),
/// matching what the admin dashboard displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "kebab-case"))]
pub enum OrderStatus {
    /// بانتظار موافقة البائع
    Pending,
    Accepted,
    Processing,
    WaitingForDriver,
    Delivering,
    Completed,
    Rejected,
    Cancelled,
}

impl OrderStatus {
    /// Legal target states from this state.
    ///
    /// Every escape to `Cancelled` from a non-terminal state is allowed;
    /// `Rejected` is reachable only from `Pending`.
    pub fn allowed_targets(self) -> &'static [OrderStatus] {
        use OrderStatus::*;
        match self {
            Pending => &[Accepted, Rejected, Cancelled],
            Accepted => &[Processing, Cancelled],
            Processing => &[WaitingForDriver, Delivering, Cancelled],
            WaitingForDriver => &[Delivering, Cancelled],
            Delivering => &[Completed, Cancelled],
            Completed | Rejected | Cancelled => &[],
        }
    }

    pub fn can_transition_to(self, target: OrderStatus) -> bool {
        self.allowed_targets().contains(&target)
    }

    /// Terminal states: no further transitions
    pub fn is_terminal(self) -> bool {
        self.allowed_targets().is_empty()
    }

    /// Default status-history note (user-facing, Arabic)
    ///
    /// Used when a transition is recorded without an explicit note.
    pub fn default_note(self) -> &'static str {
        use OrderStatus::*;
        match self {
            Pending => "تم إنشاء الطلب",
            Accepted => "تم قبول الطلب",
            Processing => "تم بدء تحضير الطلب",
            WaitingForDriver => "تمت إضافة الطلب إلى قائمة انتظار السائقين",
            Delivering => "الطلب في الطريق إلى العميل",
            Completed => "تم توصيل الطلب بنجاح",
            Rejected => "تم رفض الطلب",
            Cancelled => "تم إلغاء الطلب",
        }
    }

    pub fn as_str(self) -> &'static str {
        use OrderStatus::*;
        match self {
            Pending => "pending",
            Accepted => "accepted",
            Processing => "processing",
            WaitingForDriver => "waiting-for-driver",
            Delivering => "delivering",
            Completed => "completed",
            Rejected => "rejected",
            Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// طريقة الدفع — how the customer settles the order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum PaymentMethod {
    /// الدفع عند الاستلام — driver collects the full amount in cash
    Cash,
    /// دفع إلكتروني مسبق
    Electronic,
    /// توصيل محفظة — vendor prepaid through the platform wallet
    Wallet,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Electronic => "electronic",
            PaymentMethod::Wallet => "wallet",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    #[test]
    fn happy_path_transitions_are_legal() {
        assert!(Pending.can_transition_to(Accepted));
        assert!(Accepted.can_transition_to(Processing));
        assert!(Processing.can_transition_to(WaitingForDriver));
        assert!(Processing.can_transition_to(Delivering));
        assert!(WaitingForDriver.can_transition_to(Delivering));
        assert!(Delivering.can_transition_to(Completed));
    }

    #[test]
    fn rejection_only_from_pending() {
        assert!(Pending.can_transition_to(Rejected));
        for from in [Accepted, Processing, WaitingForDriver, Delivering] {
            assert!(!from.can_transition_to(Rejected), "{from} -> rejected");
        }
    }

    #[test]
    fn every_non_terminal_state_can_cancel() {
        for from in [Pending, Accepted, Processing, WaitingForDriver, Delivering] {
            assert!(from.can_transition_to(Cancelled), "{from} -> cancelled");
        }
    }

    #[test]
    fn terminal_states_have_no_exits() {
        for s in [Completed, Rejected, Cancelled] {
            assert!(s.is_terminal());
            assert!(!s.can_transition_to(Cancelled));
        }
    }

    #[test]
    fn skipping_acceptance_is_illegal() {
        assert!(!Pending.can_transition_to(Processing));
        assert!(!Pending.can_transition_to(Delivering));
        assert!(!Accepted.can_transition_to(Completed));
    }
}
