//! Payment Application Service
//!
//! Charges a customer's card through the gateway port and records the
//! payment through the repository port, strictly in that order.

use payments_types::{
    AppError, CardPaymentCharger, CustomerId, CustomerRepository, NewPayment, Payment, PaymentId,
    PaymentRepository, PaymentRequest,
};

/// Application service for card payments.
///
/// Generic over its three collaborators; none of them is called unless
/// every earlier step succeeded.
pub struct PaymentService<C, P, G>
where
    C: CustomerRepository,
    P: PaymentRepository,
    G: CardPaymentCharger,
{
    customers: C,
    payments: P,
    charger: G,
}

impl<C, P, G> PaymentService<C, P, G>
where
    C: CustomerRepository,
    P: PaymentRepository,
    G: CardPaymentCharger,
{
    /// Creates a new payment service with the given collaborators.
    pub fn new(customers: C, payments: P, charger: G) -> Self {
        Self {
            customers,
            payments,
            charger,
        }
    }

    /// Charges the card described by `req` on behalf of `customer_id`.
    ///
    /// Steps: input validation, customer lookup, currency allow-list,
    /// gateway charge, debit check, insert. Each one short-circuits.
    pub async fn charge_card(
        &self,
        customer_id: CustomerId,
        req: PaymentRequest,
    ) -> Result<Payment, AppError> {
        // Any customer id carried in the request is replaced by the caller's.
        let payment = NewPayment::new(
            customer_id,
            req.amount,
            req.currency,
            req.source,
            req.description,
        )?;

        // 1. Does the customer exist
        if self.customers.find_by_id(customer_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Customer {}", customer_id)));
        }

        // 2. Can this currency be charged
        if !payment.currency.is_accepted() {
            tracing::warn!(currency = %payment.currency, "Rejected unsupported currency");
            return Err(AppError::UnsupportedCurrency(payment.currency));
        }

        // 3. Charge the card
        let charge = self
            .charger
            .charge(
                &payment.source,
                payment.amount,
                payment.currency,
                payment.description.as_deref(),
            )
            .await?;

        // 4. Declined
        if !charge.is_card_debited() {
            tracing::warn!(%customer_id, "Card was not debited");
            return Err(AppError::ChargeDeclined);
        }

        // 5. Record the payment
        let id = match self.payments.insert(payment.clone()).await {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(
                    %customer_id,
                    amount = %payment.amount,
                    currency = %payment.currency,
                    error = %e,
                    "Card debited but payment could not be recorded"
                );
                return Err(AppError::PaymentNotRecorded(e));
            }
        };

        tracing::info!(payment_id = %id, %customer_id, "Card charged");
        Ok(payment.into_payment(id))
    }

    /// Looks up a payment. A missing payment is `Ok(None)`, not an error.
    pub async fn find_payment_by_id(&self, id: PaymentId) -> Result<Option<Payment>, AppError> {
        self.payments.find_by_id(id).await.map_err(Into::into)
    }
}
