use crate::service::customer::NewCustomer;
use crate::service::identity::VerificationHandle;
use crate::service::invoice::InvoiceDetail;
use crate::service::payment::PaymentRedirect;
use crate::service::session::CustomerProfile;

/// Where the purchase flow currently is. The render layer switches on this
/// tag; step data lives on the session aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PurchaseStage {
    #[default]
    Idle,
    PhoneEntry,
    OtpPending,
    GuestLookup,
    GuestRegistration,
    InvoiceCreating,
    InvoiceReview,
    PaymentRedirecting,
    ResultReady,
}

/// The mutable aggregate one purchase drives, created on plan selection
/// and cleared on close or acknowledgment.
#[derive(Debug, Clone, Default)]
pub struct PurchaseSession {
    pub plan_id: Option<String>,
    pub phone: Option<String>,
    pub verified: bool,
    pub verification: Option<VerificationHandle>,
    pub customer_id: Option<String>,
    pub new_customer: Option<NewCustomer>,
    pub invoice_id: Option<String>,
    pub invoice_detail: Option<InvoiceDetail>,
    pub guest_info: Option<CustomerProfile>,
    pub redirect: Option<PaymentRedirect>,
    pub outcome: Option<PaymentOutcome>,
    pub modal_visible: bool,
    /// Inline annotation for the input the last step failed on.
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Success,
    Failure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceStatus {
    Closed,
    Pending,
}

/// Terminal payment result, derived purely from the gateway's redirect
/// query parameters and cleared on acknowledgment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentOutcome {
    pub status: PaymentStatus,
    pub error_message: Option<String>,
    pub invoice_status: InvoiceStatus,
    pub productinfo: Option<String>,
    pub amount: Option<String>,
}
