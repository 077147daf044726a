use axum::routing::{get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{booking, health_check, referral, wallet};
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/book", post(booking::make_booking))
        .route(
            "/book/:booking_id",
            get(booking::get_booking).delete(booking::cancel_booking),
        )
        .route("/book/all", post(booking::get_my_bookings))
        .route("/eventListing/book/:event_id", get(booking::get_pre_booking_info))
        .route(
            "/referral",
            put(referral::create_referral).get(referral::get_host_referrals),
        )
        .route(
            "/referral/:code",
            get(referral::get_referral_discount)
                .delete(referral::deactivate_referral)
                .put(referral::reactivate_referral),
        )
        .route("/profile/balance/deposit", post(wallet::deposit))
        .route("/profile/balance/withdraw", post(wallet::withdraw))
        .route("/profile/transactions", post(wallet::transactions))
        .layer(create_security_headers_layer())
        .layer(create_cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
