use crate::GameAppData;
use crate::game::game_routes;
use crate::listings::listing_routes;
use crate::market::market_routes;
use crate::negotiations::negotiation_routes;
use crate::offers::offer_routes;
use axum::Router;

pub struct ServerRoutes;

impl ServerRoutes {
    pub fn create() -> Router<GameAppData> {
        Router::<GameAppData>::new()
            .merge(market_routes())
            .merge(listing_routes())
            .merge(offer_routes())
            .merge(negotiation_routes())
            .merge(game_routes())
    }
}
