use rocket::Route;

mod public;
mod voter;
mod voting;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(public::routes());
    routes.extend(voter::routes());
    routes.extend(voting::routes());
    routes
}
