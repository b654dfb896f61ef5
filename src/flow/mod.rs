pub mod model;
pub mod reconcile;

pub use model::*;
pub use reconcile::reconcile;

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;

use crate::config::FlowConfig;
use crate::error::{FlowError, FlowResult};
use crate::service::customer::{CustomerError, NewCustomer};
use crate::service::payment::PaymentRedirect;
use crate::service::session::CustomerProfile;
use crate::service::ServiceRegistry;

/// Drives one purchase from plan selection to the reconciled payment
/// result.
///
/// Transitions run on one logical thread: every public method locks the
/// flow state, releases it across its network call, and re-checks the
/// session generation before applying the result. A step whose session was
/// closed (or replaced) while it was in flight finds a newer generation
/// and discards its result instead of applying it to a cleared session.
#[derive(Clone)]
pub struct PurchaseOrchestrator {
    services: ServiceRegistry,
    config: FlowConfig,
    inner: Arc<Mutex<FlowInner>>,
}

#[derive(Default)]
struct FlowInner {
    stage: PurchaseStage,
    session: PurchaseSession,
    generation: u64,
    last_select: Option<(String, Instant)>,
}

impl FlowInner {
    fn reset(&mut self) {
        self.generation += 1;
        self.session = PurchaseSession::default();
        self.stage = PurchaseStage::Idle;
    }
}

impl PurchaseOrchestrator {
    pub fn new(services: ServiceRegistry, config: &FlowConfig) -> Self {
        Self {
            services,
            config: config.clone(),
            inner: Arc::new(Mutex::new(FlowInner::default())),
        }
    }

    /// Restores the persisted snapshot and, when the process was entered
    /// through the gateway's redirect back, reconciles the outcome. The
    /// outcome takes precedence over any restored entry modal.
    pub async fn startup(&self, return_url: Option<&str>) -> FlowResult<PurchaseStage> {
        let snapshot = self.services.session.load().await?;

        let outcome = return_url.and_then(reconcile::reconcile);

        let stage = {
            let mut inner = self.inner.lock().await;
            inner.session.guest_info = snapshot.guest_info;
            inner.session.modal_visible = snapshot.modal_visible;

            if let Some(outcome) = outcome {
                info!("Reconciled payment outcome: {:?}", outcome.status);
                inner.session.outcome = Some(outcome);
                inner.session.modal_visible = false;
                inner.stage = PurchaseStage::ResultReady;
            }

            inner.stage.clone()
        };

        if stage == PurchaseStage::ResultReady {
            self.services.session.save_modal_visible(false).await?;
        }

        Ok(stage)
    }

    /// Starts a purchase. Re-selecting the same plan within the guard
    /// window is ignored so a double-click cannot spawn two sessions.
    pub async fn select_plan(&self, plan_id: &str) -> FlowResult<PurchaseStage> {
        {
            let mut inner = self.inner.lock().await;

            if let Some((last_plan, at)) = &inner.last_select {
                if last_plan == plan_id && at.elapsed() < self.config.select_guard {
                    debug!("Ignoring duplicate selection of plan {}", plan_id);
                    return Ok(inner.stage.clone());
                }
            }

            inner.reset();
            inner.last_select = Some((plan_id.to_string(), Instant::now()));
            inner.session.plan_id = Some(plan_id.to_string());
            inner.session.modal_visible = true;
            inner.stage = PurchaseStage::PhoneEntry;
        }

        self.services.session.save_guest_info(None).await?;
        self.services.session.save_modal_visible(true).await?;

        Ok(PurchaseStage::PhoneEntry)
    }

    /// Sends the OTP. Failure keeps the flow in `PhoneEntry` with the
    /// error annotated for the input.
    pub async fn submit_phone(&self, phone: &str) -> FlowResult<PurchaseStage> {
        let generation = {
            let mut inner = self.inner.lock().await;
            self.require_stage(&inner, PurchaseStage::PhoneEntry, "submit_phone")?;
            inner.session.last_error = None;
            inner.generation
        };

        match self.services.identity.send_code(phone).await {
            Ok(handle) => {
                let mut inner = self.inner.lock().await;
                if inner.generation != generation {
                    debug!("Discarding stale send-code result");
                    return Ok(inner.stage.clone());
                }
                inner.session.phone = Some(phone.to_string());
                inner.session.verification = Some(handle);
                inner.stage = PurchaseStage::OtpPending;
                Ok(inner.stage.clone())
            }
            Err(e) => {
                warn!("Error in OTP sending: {}", e);
                let mut inner = self.inner.lock().await;
                if inner.generation != generation {
                    return Ok(inner.stage.clone());
                }
                inner.session.last_error = Some(e.to_string());
                Ok(inner.stage.clone())
            }
        }
    }

    /// Verifies the code and, on success, continues straight into customer
    /// lookup. A wrong or expired code keeps the flow in `OtpPending`.
    pub async fn submit_otp(&self, code: &str) -> FlowResult<PurchaseStage> {
        let (generation, handle, phone) = {
            let mut inner = self.inner.lock().await;
            self.require_stage(&inner, PurchaseStage::OtpPending, "submit_otp")?;
            inner.session.last_error = None;

            let handle = inner
                .session
                .verification
                .clone()
                .ok_or_else(|| FlowError::InvalidState("No verification in flight".to_string()))?;
            let phone = inner
                .session
                .phone
                .clone()
                .ok_or_else(|| FlowError::InvalidState("No phone on session".to_string()))?;

            (inner.generation, handle, phone)
        };

        if let Err(e) = self.services.identity.verify_code(&handle, code).await {
            let mut inner = self.inner.lock().await;
            if inner.generation != generation {
                debug!("Discarding stale verify result");
                return Ok(inner.stage.clone());
            }
            inner.session.last_error = Some(e.to_string());
            return Ok(inner.stage.clone());
        }

        {
            let mut inner = self.inner.lock().await;
            if inner.generation != generation {
                debug!("Discarding stale verify result");
                return Ok(inner.stage.clone());
            }
            inner.session.verified = true;
            inner.stage = PurchaseStage::GuestLookup;
        }

        self.lookup_customer(generation, &phone).await
    }

    async fn lookup_customer(&self, generation: u64, phone: &str) -> FlowResult<PurchaseStage> {
        match self.services.customer.resolve(phone).await {
            Ok(customer_id) => {
                {
                    let mut inner = self.inner.lock().await;
                    if inner.generation != generation {
                        return Ok(inner.stage.clone());
                    }
                    inner.session.customer_id = Some(customer_id);
                    inner.stage = PurchaseStage::InvoiceCreating;
                }
                self.create_invoice(generation).await
            }
            Err(CustomerError::NotFound) => {
                let mut inner = self.inner.lock().await;
                if inner.generation != generation {
                    return Ok(inner.stage.clone());
                }
                inner.stage = PurchaseStage::GuestRegistration;
                Ok(inner.stage.clone())
            }
            Err(e) => {
                error!("Error searching customer: {}", e);
                let mut inner = self.inner.lock().await;
                if inner.generation != generation {
                    return Ok(inner.stage.clone());
                }
                inner.session.last_error = Some(e.to_string());
                Ok(inner.stage.clone())
            }
        }
    }

    /// Registers a first-time customer, then continues into invoice
    /// creation.
    pub async fn submit_registration(&self, profile: NewCustomer) -> FlowResult<PurchaseStage> {
        let (generation, phone) = {
            let mut inner = self.inner.lock().await;
            self.require_stage(&inner, PurchaseStage::GuestRegistration, "submit_registration")?;
            inner.session.last_error = None;

            let phone = inner
                .session
                .phone
                .clone()
                .ok_or_else(|| FlowError::InvalidState("No phone on session".to_string()))?;

            (inner.generation, phone)
        };

        match self.services.customer.register(&phone, &profile).await {
            Ok(record) => {
                let guest_info = CustomerProfile::from(&record);
                {
                    let mut inner = self.inner.lock().await;
                    if inner.generation != generation {
                        return Ok(inner.stage.clone());
                    }
                    inner.session.customer_id = Some(record.id.clone());
                    inner.session.new_customer = Some(profile);
                    inner.session.guest_info = Some(guest_info.clone());
                    inner.stage = PurchaseStage::InvoiceCreating;
                }

                self.services.session.save_guest_info(Some(&guest_info)).await?;

                self.create_invoice(generation).await
            }
            Err(e) => {
                error!("Error creating customer: {}", e);
                let mut inner = self.inner.lock().await;
                if inner.generation != generation {
                    return Ok(inner.stage.clone());
                }
                inner.session.last_error = Some(e.to_string());
                Ok(inner.stage.clone())
            }
        }
    }

    async fn create_invoice(&self, generation: u64) -> FlowResult<PurchaseStage> {
        let (customer_id, plan_id) = {
            let inner = self.inner.lock().await;
            if inner.generation != generation {
                return Ok(inner.stage.clone());
            }
            let customer_id = inner
                .session
                .customer_id
                .clone()
                .ok_or_else(|| FlowError::InvalidState("Invoice creation without a customer".to_string()))?;
            (customer_id, inner.session.plan_id.clone())
        };

        match self
            .services
            .invoice
            .create_invoice(&customer_id, plan_id.as_deref())
            .await
        {
            Ok(invoice_id) => {
                {
                    let mut inner = self.inner.lock().await;
                    if inner.generation != generation {
                        return Ok(inner.stage.clone());
                    }
                    inner.session.invoice_id = Some(invoice_id);
                }
                self.fetch_invoice_detail(generation).await
            }
            Err(e) => {
                error!("Error creating invoice: {}", e);
                let mut inner = self.inner.lock().await;
                if inner.generation != generation {
                    return Ok(inner.stage.clone());
                }
                inner.session.last_error = Some(e.to_string());
                Ok(inner.stage.clone())
            }
        }
    }

    /// Re-polls the invoice detail while the billing service is still
    /// composing the invoice.
    pub async fn poll_invoice(&self) -> FlowResult<PurchaseStage> {
        let generation = {
            let inner = self.inner.lock().await;
            self.require_stage(&inner, PurchaseStage::InvoiceCreating, "poll_invoice")?;
            inner.generation
        };

        self.fetch_invoice_detail(generation).await
    }

    async fn fetch_invoice_detail(&self, generation: u64) -> FlowResult<PurchaseStage> {
        let invoice_id = {
            let inner = self.inner.lock().await;
            if inner.generation != generation {
                return Ok(inner.stage.clone());
            }
            match inner.session.invoice_id.clone() {
                Some(id) => id,
                None => return Ok(inner.stage.clone()),
            }
        };

        match self.services.invoice.fetch_detail(&invoice_id).await {
            Ok(Some(detail)) => {
                let guest_info = CustomerProfile::from(&detail);
                {
                    let mut inner = self.inner.lock().await;
                    if inner.generation != generation {
                        debug!("Discarding stale invoice detail");
                        return Ok(inner.stage.clone());
                    }
                    inner.session.invoice_detail = Some(detail);
                    inner.session.guest_info = Some(guest_info.clone());
                    inner.session.modal_visible = true;
                    inner.stage = PurchaseStage::InvoiceReview;
                }

                self.services.session.save_guest_info(Some(&guest_info)).await?;
                self.services.session.save_modal_visible(true).await?;

                Ok(PurchaseStage::InvoiceReview)
            }
            Ok(None) => {
                debug!("Invoice {} not composed yet, staying in wait state", invoice_id);
                let inner = self.inner.lock().await;
                Ok(inner.stage.clone())
            }
            Err(e) => {
                error!("Error fetching invoice details: {}", e);
                let mut inner = self.inner.lock().await;
                if inner.generation != generation {
                    return Ok(inner.stage.clone());
                }
                inner.session.last_error = Some(e.to_string());
                Ok(inner.stage.clone())
            }
        }
    }

    /// Builds the signed gateway redirect. After this the page is expected
    /// to unload; control returns through `startup` with a return URL.
    pub async fn confirm(&self) -> FlowResult<PaymentRedirect> {
        let mut inner = self.inner.lock().await;
        self.require_stage(&inner, PurchaseStage::InvoiceReview, "confirm")?;

        let detail = inner
            .session
            .invoice_detail
            .clone()
            .ok_or_else(|| FlowError::InvalidState("Payment handoff without invoice detail".to_string()))?;
        let phone = inner
            .session
            .phone
            .clone()
            .ok_or_else(|| FlowError::InvalidState("Payment handoff without phone".to_string()))?;

        let redirect = self.services.payment.build_redirect(&detail, &phone);
        inner.session.redirect = Some(redirect.clone());
        inner.stage = PurchaseStage::PaymentRedirecting;

        Ok(redirect)
    }

    /// Clears a reconciled outcome after the user has seen it.
    pub async fn acknowledge(&self) -> FlowResult<PurchaseStage> {
        {
            let mut inner = self.inner.lock().await;
            self.require_stage(&inner, PurchaseStage::ResultReady, "acknowledge")?;
            inner.reset();
        }

        self.services.session.clear().await?;

        Ok(PurchaseStage::Idle)
    }

    /// Explicit close from any state. In-flight results for the old
    /// session are discarded when they arrive.
    pub async fn close(&self) -> FlowResult<PurchaseStage> {
        {
            let mut inner = self.inner.lock().await;
            inner.reset();
        }

        self.services.session.clear().await?;

        Ok(PurchaseStage::Idle)
    }

    pub async fn stage(&self) -> PurchaseStage {
        self.inner.lock().await.stage.clone()
    }

    pub async fn session(&self) -> PurchaseSession {
        self.inner.lock().await.session.clone()
    }

    pub async fn last_error(&self) -> Option<String> {
        self.inner.lock().await.session.last_error.clone()
    }

    fn require_stage(&self, inner: &FlowInner, expected: PurchaseStage, operation: &str) -> FlowResult<()> {
        if inner.stage != expected {
            return Err(FlowError::InvalidState(format!(
                "{} is not allowed in {:?}",
                operation, inner.stage
            )));
        }
        Ok(())
    }
}
