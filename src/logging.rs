use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};

use log::Level;
use rocket::{
    fairing::{Fairing, Info, Kind},
    http::{Status, StatusClass},
    request::{FromRequest, Outcome},
    Data, Orbit, Request, Response, Rocket, Route,
};

use crate::model::store::BallotStore;

/// Sequence number tying a request's log lines to its response's.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct RequestId(pub usize);

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl RequestId {
    /// Next number in the process-wide sequence. Wraps on overflow.
    pub fn next() -> RequestId {
        static SEQUENCE: AtomicUsize = AtomicUsize::new(0);
        RequestId(SEQUENCE.fetch_add(1, Ordering::Relaxed))
    }

    /// The ID assigned to this request, allocating one on first use.
    fn of(req: &Request<'_>) -> RequestId {
        *req.local_cache(RequestId::next)
    }
}

/// Lets handlers tag their own log lines with the request's ID.
#[rocket::async_trait]
impl<'r> FromRequest<'r> for &'r RequestId {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        Outcome::Success(req.local_cache(RequestId::next))
    }
}

/// How loudly a response is logged: failed ballots and unknown voters are
/// worth a warning, server faults an error.
fn level_for(status: Status) -> Level {
    match status.class() {
        StatusClass::ServerError => Level::Error,
        StatusClass::ClientError => Level::Warn,
        _ => Level::Info,
    }
}

fn describe_route(route: Option<&Route>) -> String {
    match route {
        Some(route) => match &route.name {
            Some(name) => format!("{name} ({})", route.uri),
            None => route.uri.to_string(),
        },
        None => "no matching route".to_string(),
    }
}

/// Traces every request through the server as a `->reqN` / `<-rspN` pair,
/// and reports the state of the ballot store at launch.
#[derive(Debug, Copy, Clone)]
pub struct LoggerFairing;

#[rocket::async_trait]
impl Fairing for LoggerFairing {
    fn info(&self) -> Info {
        Info {
            name: "Request logger",
            kind: Kind::Liftoff | Kind::Request | Kind::Response | Kind::Shutdown,
        }
    }

    async fn on_liftoff(&self, rocket: &Rocket<Orbit>) {
        let config = rocket.config();
        let scheme = if config.tls_enabled() { "https" } else { "http" };
        info!(
            "Ballot box open at {scheme}://{}:{}",
            config.address, config.port
        );

        match rocket.state::<BallotStore>() {
            Some(store) => {
                let summary = store.summary().await;
                info!(
                    "Catalog holds {} candidates; {} votes already cast by {} of {} registered voters",
                    store.catalog().len(),
                    summary.total_votes,
                    summary.participating_voters,
                    summary.registered_voters,
                );
            }
            None => warn!("No ballot store under management, every route will fail"),
        }
    }

    async fn on_request(&self, req: &mut Request<'_>, _data: &mut Data<'_>) {
        let id = RequestId::of(req);
        info!("->req{id} {} {}", req.method(), req.uri());
    }

    async fn on_response<'r>(&self, req: &'r Request<'_>, res: &mut Response<'r>) {
        let id = RequestId::of(req);
        let status = res.status();
        log::log!(
            level_for(status),
            "<-rsp{id} {status} {}",
            describe_route(req.route())
        );
    }

    async fn on_shutdown(&self, _rocket: &Rocket<Orbit>) {
        warn!("Shutting down, no further ballots will be accepted");
    }
}

#[cfg(test)]
mod tests {
    use rocket::local::asynchronous::Client;

    use super::*;

    #[test]
    fn ids_increase() {
        let first = RequestId::next();
        let second = RequestId::next();
        assert!(second > first);
        assert_eq!(first.to_string(), first.0.to_string());
    }

    #[test]
    fn levels_follow_status_class() {
        assert_eq!(level_for(Status::Ok), Level::Info);
        assert_eq!(level_for(Status::UnprocessableEntity), Level::Warn);
        assert_eq!(level_for(Status::Conflict), Level::Warn);
        assert_eq!(level_for(Status::InternalServerError), Level::Error);
    }

    #[test]
    fn unmatched_route_described() {
        assert_eq!(describe_route(None), "no matching route");
    }

    #[backend_test]
    async fn unmatched_routes_answered(client: Client) {
        let response = client.get("/no/such/route").dispatch().await;
        assert_eq!(Status::NotFound, response.status());
    }
}
