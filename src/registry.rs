//! Middleware registry and chain assembly.
//!
//! The registry is where an application declares its middleware. It owns
//! the [`Sequence`] that numbers every entry, keeps app-wide and per-route
//! declarations apart, and hands the framework a sorted chain for a given
//! route and location. It never runs anything.

use std::borrow::Cow;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use tracing::debug;

use crate::location::Location;
use crate::middleware::{Middleware, Source, convert};
use crate::sequence::Sequence;

/// Declared middleware, grouped by scope and location.
///
/// Build it once at startup. Each registration method returns `self` so
/// declarations chain naturally, and each declaration is numbered the moment
/// it is made, so declaration order is the tie-breaker when priorities are
/// equal.
///
/// ```rust
/// use std::sync::Arc;
/// use tsu_middleware::{Location, Registry};
///
/// type Mw = dyn Fn(&mut Vec<&'static str>) + Send + Sync;
///
/// fn step(name: &'static str) -> Arc<Mw> {
///     Arc::new(move |log: &mut Vec<&'static str>| log.push(name))
/// }
///
/// let registry = Registry::<Mw>::new()
///     .on_request(step("request-id"))
///     .register(Location::Request, -10, step("auth"))
///     .register_for("upload", Location::Request, 0, step("size-check"));
///
/// let mut log: Vec<&'static str> = Vec::new();
/// for mw in registry.chain(Location::Request, Some("upload")) {
///     mw.call((&mut log,));
/// }
/// assert_eq!(log, ["auth", "size-check", "request-id"]);
/// ```
pub struct Registry<F: ?Sized> {
    sequence: Arc<Sequence>,
    app: HashMap<Location, Vec<Middleware<F>>>,
    routes: HashMap<String, HashMap<Location, Vec<Middleware<F>>>>,
}

impl<F: ?Sized> Registry<F> {
    pub fn new() -> Self {
        Self::with_sequence(Arc::new(Sequence::new()))
    }

    /// A registry numbering its entries from a caller-supplied counter.
    ///
    /// Share one counter between registries (e.g. an app and its
    /// blueprints) when their entries will end up in the same chain.
    /// Entries numbered by different counters do not order meaningfully
    /// against each other and can even compare equal.
    pub fn with_sequence(sequence: Arc<Sequence>) -> Self {
        Self { sequence, app: HashMap::new(), routes: HashMap::new() }
    }

    /// The counter this registry numbers entries from. Use it to pre-build
    /// entries that will be [`push`](Registry::push)ed later.
    pub fn sequence(&self) -> &Arc<Sequence> {
        &self.sequence
    }

    /// App-wide request middleware with priority `0`.
    pub fn on_request(self, func: Arc<F>) -> Self {
        self.register(Location::Request, 0, func)
    }

    /// App-wide response middleware with priority `0`.
    pub fn on_response(self, func: Arc<F>) -> Self {
        self.register(Location::Response, 0, func)
    }

    /// App-wide middleware with an explicit location and priority.
    pub fn register(self, location: Location, priority: i32, func: Arc<F>) -> Self {
        let mw = Middleware::with_priority(func, location, priority, &self.sequence);
        self.add(None, location, mw)
    }

    /// Like [`register`](Registry::register) or
    /// [`register_for`](Registry::register_for), with a name for `Display`
    /// and the `tracing` events. Trait objects have no useful name of their
    /// own.
    pub fn register_named(
        self,
        route: Option<&str>,
        location: Location,
        priority: i32,
        name: impl Into<Cow<'static, str>>,
        func: Arc<F>,
    ) -> Self {
        let mw = Middleware::with_priority(func, location, priority, &self.sequence).named(name);
        self.add(route, location, mw)
    }

    /// Middleware that only applies to the route named `route`.
    pub fn register_for(self, route: &str, location: Location, priority: i32, func: Arc<F>) -> Self {
        let mw = Middleware::with_priority(func, location, priority, &self.sequence);
        self.add(Some(route), location, mw)
    }

    /// Appends a raw function or a pre-built entry, app-wide when `route`
    /// is `None`.
    ///
    /// Raw functions are numbered now with priority `0` and filed under
    /// `location`. Pre-built entries keep their own priority, sequence number
    /// and location; `location` is ignored for them. Pre-build entries with
    /// [`sequence`](Registry::sequence) so they order against the rest.
    pub fn push(self, route: Option<&str>, location: Location, source: impl Into<Source<F>>) -> Self {
        let mw = Into::<Source<F>>::into(source).into_middleware(location, &self.sequence);
        let location = mw.location();
        self.add(route, location, mw)
    }

    fn add(mut self, route: Option<&str>, location: Location, mw: Middleware<F>) -> Self {
        debug!(
            name = %mw.name(),
            priority = mw.priority(),
            location = %location,
            definition = mw.definition(),
            route = route.unwrap_or("*"),
            "middleware registered",
        );
        let scope = match route {
            Some(route) => self.routes.entry(route.to_owned()).or_default(),
            None => &mut self.app,
        };
        scope.entry(location).or_default().push(mw);
        self
    }

    /// The sorted chain for `location`: app-wide entries, then entries
    /// registered for `route`, ordered by [`Middleware::order`].
    ///
    /// An unknown route simply contributes nothing.
    pub fn chain(&self, location: Location, route: Option<&str>) -> VecDeque<Middleware<F>> {
        let app = self.app.get(&location).map(Vec::as_slice).unwrap_or_default();
        let scoped = route
            .and_then(|r| self.routes.get(r))
            .and_then(|scope| scope.get(&location))
            .map(Vec::as_slice)
            .unwrap_or_default();

        let mut queue: VecDeque<Middleware<F>> =
            convert([app, scoped].map(|group| group.iter().cloned()), location, &self.sequence);
        queue.make_contiguous().sort();

        debug!(location = %location, route = route.unwrap_or("*"), len = queue.len(), "middleware chain assembled");
        queue
    }

    /// Number of entries declared for `location`, across every scope.
    pub fn len(&self, location: Location) -> usize {
        let app = self.app.get(&location).map_or(0, Vec::len);
        let routes: usize = self.routes.values()
            .filter_map(|scope| scope.get(&location))
            .map(Vec::len)
            .sum();
        app + routes
    }

    pub fn is_empty(&self) -> bool {
        self.len(Location::Request) == 0 && self.len(Location::Response) == 0
    }
}

impl<F: ?Sized> Default for Registry<F> {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Mw = dyn Fn(u32) -> u32 + Send + Sync;

    fn f(offset: u32) -> Arc<Mw> {
        Arc::new(move |x: u32| x + offset)
    }

    fn definitions(queue: &VecDeque<Middleware<Mw>>) -> Vec<u64> {
        queue.iter().map(Middleware::definition).collect()
    }

    #[test]
    fn declaration_numbers_follow_registration_order() {
        let registry: Registry<Mw> = Registry::new()
            .on_request(f(0))
            .on_response(f(1))
            .on_request(f(2));

        let request = registry.chain(Location::Request, None);
        // Equal priority: later declaration first.
        assert_eq!(definitions(&request), [2, 0]);
        assert_eq!(definitions(&registry.chain(Location::Response, None)), [1]);
        assert_eq!(registry.sequence().peek(), 3);
    }

    #[test]
    fn chain_sorts_app_and_route_entries_together() {
        let registry: Registry<Mw> = Registry::new()
            .register(Location::Request, 5, f(0))
            .register_for("users", Location::Request, -1, f(1))
            .register(Location::Request, 0, f(2))
            .register_for("users", Location::Request, 0, f(3))
            .register_for("orders", Location::Request, -9, f(4));

        let users = registry.chain(Location::Request, Some("users"));
        assert_eq!(definitions(&users), [1, 3, 2, 0]);

        let app_only = registry.chain(Location::Request, None);
        assert_eq!(definitions(&app_only), [2, 0]);

        let unknown = registry.chain(Location::Request, Some("missing"));
        assert_eq!(definitions(&unknown), [2, 0]);
    }

    #[test]
    fn chain_is_stable_across_calls() {
        let registry: Registry<Mw> = Registry::new().on_request(f(0)).on_request(f(1));
        let first = definitions(&registry.chain(Location::Request, None));
        let second = definitions(&registry.chain(Location::Request, None));
        assert_eq!(first, second);
        assert_eq!(registry.sequence().peek(), 2);
    }

    #[test]
    fn pushed_entries_keep_their_own_fields() {
        let registry: Registry<Mw> = Registry::new();
        let early = Middleware::with_priority(f(10), Location::Request, -3, registry.sequence()).named("early");
        let registry = registry
            .on_request(f(0))
            .push(None, Location::Request, early)
            .push(Some("users"), Location::Request, f(20));

        let chain = registry.chain(Location::Request, Some("users"));
        assert_eq!(chain.len(), 3);
        assert_eq!(chain[0].name(), "early");
        assert_eq!(chain[0].definition(), 0);
        assert_eq!(chain[0].call((1,)), 11);
        // Raw push at priority 0, declared after `on_request`.
        assert_eq!(chain[1].call((1,)), 21);
        assert_eq!(chain[2].call((1,)), 1);
    }

    #[test]
    fn pushed_entries_stay_in_their_own_phase() {
        let registry: Registry<Mw> = Registry::new();
        let resp = Middleware::new(f(5), Location::Response, registry.sequence()).named("gzip");
        let registry = registry.push(None, Location::Request, resp);

        assert!(registry.chain(Location::Request, None).is_empty());
        assert_eq!(registry.len(Location::Request), 0);
        assert_eq!(registry.len(Location::Response), 1);

        let response = registry.chain(Location::Response, None);
        assert_eq!(response.len(), 1);
        assert_eq!(response[0].name(), "gzip");
        assert_eq!(response[0].location(), Location::Response);
    }

    #[test]
    fn named_registrations_show_the_given_name() {
        let registry: Registry<Mw> = Registry::new()
            .register_named(None, Location::Request, -1, "request_id", f(0))
            .register_named(Some("users"), Location::Response, 2, String::from("cors"), f(1));

        let request = registry.chain(Location::Request, None);
        assert_eq!(
            request[0].to_string(),
            "Middleware(func=<function request_id>, priority=-1, location=REQUEST)",
        );

        let response = registry.chain(Location::Response, Some("users"));
        assert_eq!(
            response[0].to_string(),
            "Middleware(func=<function cors>, priority=2, location=RESPONSE)",
        );
        assert!(registry.chain(Location::Response, None).is_empty());
    }

    #[test]
    fn shared_sequence_orders_across_registries() {
        let seq = Arc::new(Sequence::new());
        let app: Registry<Mw> = Registry::with_sequence(Arc::clone(&seq)).on_request(f(0));
        let blueprint: Registry<Mw> = Registry::with_sequence(Arc::clone(&seq)).on_request(f(1));

        let a = app.chain(Location::Request, None);
        let b = blueprint.chain(Location::Request, None);
        assert!(b[0] < a[0]);
    }

    #[test]
    fn len_counts_every_scope() {
        let registry: Registry<Mw> = Registry::default();
        assert!(registry.is_empty());

        let registry = registry
            .on_request(f(0))
            .register_for("a", Location::Request, 0, f(1))
            .register_for("b", Location::Response, 0, f(2));
        assert_eq!(registry.len(Location::Request), 2);
        assert_eq!(registry.len(Location::Response), 1);
        assert!(!registry.is_empty());
    }
}
