//! Coupon session state machine.
//!
//! One coupon at most is in play per checkout session:
//!
//! ```text
//! NoCoupon -> Validating -> Applied
//!                        -> Rejected(message) -> NoCoupon
//! Applied  -> NoCoupon   (explicit removal)
//! ```
//!
//! Validation is delegated entirely to the [`CouponValidator`] collaborator;
//! the session stores whatever discount the server granted. Applied coupons
//! are transient - never persisted - so a reload always starts at
//! `NoCoupon` and must re-validate.
//!
//! Each validation attempt carries a generation number. Removing the coupon
//! or starting a new attempt bumps the generation, so a response from a
//! superseded attempt is discarded instead of overwriting newer state.

use bazaar_core::{AppliedCoupon, CouponCode, Price};

use crate::api::{ApiError, CouponValidator};
use crate::cart::CartLine;

/// Where the session currently stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CouponState {
    /// No coupon in play.
    #[default]
    NoCoupon,
    /// A validation request is in flight.
    Validating,
    /// The server accepted the code and granted a discount.
    Applied(AppliedCoupon),
    /// The server rejected the code; the message is shown inline.
    Rejected {
        /// Server-provided rejection message.
        message: String,
    },
}

/// Per-checkout-session coupon state.
#[derive(Debug, Default)]
pub struct CouponSession {
    state: CouponState,
    generation: u64,
}

impl CouponSession {
    /// Create a fresh session with no coupon in play.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> &CouponState {
        &self.state
    }

    /// The applied coupon, if validation has succeeded.
    #[must_use]
    pub const fn applied(&self) -> Option<&AppliedCoupon> {
        match &self.state {
            CouponState::Applied(coupon) => Some(coupon),
            _ => None,
        }
    }

    /// Drop the coupon and return to `NoCoupon` immediately.
    ///
    /// Purely local: the discount disappears from the breakdown without
    /// contacting the server. Also invalidates any validation still in
    /// flight.
    pub fn remove(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.state = CouponState::NoCoupon;
    }

    /// Start a validation attempt, superseding any earlier one.
    ///
    /// Returns the generation token to pass to [`complete_validation`].
    ///
    /// [`complete_validation`]: Self::complete_validation
    pub fn begin_validation(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.state = CouponState::Validating;
        self.generation
    }

    /// Record the outcome of the validation attempt `generation`.
    ///
    /// Returns `false` when the attempt was superseded (a newer attempt
    /// started, or the coupon was removed) - the outcome is discarded and
    /// the state left untouched.
    pub fn complete_validation(
        &mut self,
        generation: u64,
        outcome: Result<AppliedCoupon, String>,
    ) -> bool {
        if generation != self.generation {
            tracing::debug!(generation, "discarding stale coupon validation response");
            return false;
        }

        self.state = match outcome {
            Ok(coupon) => CouponState::Applied(coupon),
            Err(message) => CouponState::Rejected { message },
        };
        true
    }

    /// Validate `code` against the cart and apply the granted discount.
    ///
    /// If a coupon is already applied it is removed first and the new code
    /// validated from scratch. On rejection the session ends up in
    /// [`CouponState::Rejected`] with the server's message.
    ///
    /// # Errors
    ///
    /// Returns the validator's error; the session state reflects it.
    pub async fn apply<V: CouponValidator>(
        &mut self,
        validator: &V,
        code: CouponCode,
        lines: &[CartLine],
    ) -> Result<AppliedCoupon, ApiError> {
        if matches!(self.state, CouponState::Applied(_)) {
            self.remove();
        }

        let generation = self.begin_validation();
        let order_total: Price = lines.iter().map(CartLine::line_total).sum();

        match validator.validate_coupon(&code, order_total, lines).await {
            Ok(coupon) => {
                self.complete_validation(generation, Ok(coupon.clone()));
                Ok(coupon)
            }
            Err(e) => {
                self.complete_validation(generation, Err(e.to_string()));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bazaar_core::{ProductId, ProductSnapshot, VendorId};

    struct StubValidator {
        outcome: Result<AppliedCoupon, String>,
    }

    impl CouponValidator for StubValidator {
        async fn validate_coupon(
            &self,
            _code: &CouponCode,
            _order_total: Price,
            _lines: &[CartLine],
        ) -> Result<AppliedCoupon, ApiError> {
            self.outcome.clone().map_err(|message| ApiError::Api {
                status: 400,
                message,
            })
        }

        async fn apply_coupon(&self, _code: &CouponCode) -> Result<(), ApiError> {
            Ok(())
        }
    }

    fn coupon(code: &str, discount_cents: i64) -> AppliedCoupon {
        AppliedCoupon {
            code: CouponCode::parse(code).unwrap(),
            discount: Price::from_cents(discount_cents),
            description: "Test".to_string(),
        }
    }

    fn lines() -> Vec<CartLine> {
        vec![CartLine {
            product: ProductSnapshot {
                id: ProductId::new("p-1"),
                name: "Mug".to_string(),
                price: Price::from_cents(2000),
                stock: 5,
                image: None,
                vendor: VendorId::new("v-1"),
            },
            quantity: 2,
        }]
    }

    #[tokio::test]
    async fn test_apply_success_transitions_to_applied() {
        let validator = StubValidator {
            outcome: Ok(coupon("SAVE10", 1000)),
        };
        let mut session = CouponSession::new();

        let applied = session
            .apply(&validator, CouponCode::parse("save10").unwrap(), &lines())
            .await
            .unwrap();

        assert_eq!(applied.discount, Price::from_cents(1000));
        assert_eq!(session.applied(), Some(&coupon("SAVE10", 1000)));
    }

    #[tokio::test]
    async fn test_apply_rejection_records_message() {
        let validator = StubValidator {
            outcome: Err("Coupon expired".to_string()),
        };
        let mut session = CouponSession::new();

        let err = session
            .apply(&validator, CouponCode::parse("OLD").unwrap(), &lines())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Coupon expired");
        assert_eq!(
            session.state(),
            &CouponState::Rejected {
                message: "Coupon expired".to_string()
            }
        );
        assert!(session.applied().is_none());
    }

    #[tokio::test]
    async fn test_apply_over_applied_replaces_coupon() {
        let mut session = CouponSession::new();

        let first = StubValidator {
            outcome: Ok(coupon("FIRST", 500)),
        };
        session
            .apply(&first, CouponCode::parse("FIRST").unwrap(), &lines())
            .await
            .unwrap();

        let second = StubValidator {
            outcome: Ok(coupon("SECOND", 800)),
        };
        session
            .apply(&second, CouponCode::parse("SECOND").unwrap(), &lines())
            .await
            .unwrap();

        assert_eq!(session.applied(), Some(&coupon("SECOND", 800)));
    }

    #[test]
    fn test_remove_resets_immediately() {
        let mut session = CouponSession::new();
        let generation = session.begin_validation();
        session.complete_validation(generation, Ok(coupon("SAVE", 100)));
        assert!(session.applied().is_some());

        session.remove();
        assert_eq!(session.state(), &CouponState::NoCoupon);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut session = CouponSession::new();

        let stale = session.begin_validation();
        let current = session.begin_validation();

        // The superseded attempt's response arrives late and is ignored
        assert!(!session.complete_validation(stale, Ok(coupon("STALE", 999))));
        assert_eq!(session.state(), &CouponState::Validating);

        assert!(session.complete_validation(current, Ok(coupon("FRESH", 100))));
        assert_eq!(session.applied(), Some(&coupon("FRESH", 100)));
    }

    #[test]
    fn test_removal_invalidates_in_flight_validation() {
        let mut session = CouponSession::new();

        let generation = session.begin_validation();
        session.remove();

        // The response from before the removal must not resurrect the coupon
        assert!(!session.complete_validation(generation, Ok(coupon("GHOST", 100))));
        assert_eq!(session.state(), &CouponState::NoCoupon);
    }
}
