mod caller;
mod health;
mod metrics;
mod recipes;
mod users;

pub use caller::{CallerId, USER_ID_HEADER};
pub use health::health_handler;
pub use metrics::metrics_handler;
pub use recipes::generate_handler;
pub use users::{
    create_ingredients_handler, delete_cooking_preference_handler, delete_ingredients_handler,
    get_cooking_preference_handler, list_ingredients_handler, register_handler,
    save_cooking_preference_handler,
};
