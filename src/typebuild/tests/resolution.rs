use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use typebuild::prelude::*;

static CONNECTIONS: AtomicUsize = AtomicUsize::new(0);

pub struct Config;

#[injectable]
impl Config {
    #[dependency]
    fn new() -> Self {
        Config
    }
}

pub struct Pool {
    id: usize,
}

#[injectable]
impl Pool {
    #[dependency(singleton)]
    fn new(_config: Arc<Config>) -> Self {
        Pool {
            id: CONNECTIONS.fetch_add(1, Ordering::SeqCst),
        }
    }
}

pub struct Clock;

#[injectable]
impl Clock {
    #[dependency]
    fn new() -> Self {
        Clock
    }
}

pub trait Repository: Send + Sync {
    fn describe(&self) -> String;
}

pub struct SqlRepository {
    pool: Arc<Pool>,
}

#[injectable(satisfies(dyn Repository))]
impl SqlRepository {
    #[dependency(alias = dyn Repository)]
    fn new(pool: Arc<Pool>) -> Self {
        SqlRepository { pool }
    }
}

impl Repository for SqlRepository {
    fn describe(&self) -> String {
        format!("sql#{}", self.pool.id)
    }
}

pub struct Service {
    repository: Contract<dyn Repository>,
    clock: Arc<Clock>,
}

#[injectable]
impl Service {
    #[dependency]
    fn new(repository: Contract<dyn Repository>, clock: Arc<Clock>) -> Self {
        Service { repository, clock }
    }
}

pub struct Ticker {
    clock: Arc<Clock>,
}

#[injectable]
impl Ticker {
    #[dependency]
    fn new(#[injection(transient)] clock: Arc<Clock>) -> Self {
        Ticker { clock }
    }
}

fn container() -> Container {
    let mut container = Container::new();
    container.declare::<Config>();
    container.declare::<Pool>();
    container.declare::<Clock>();
    container.declare_contract::<dyn Repository>();
    container
}

#[test]
fn resolve_through_contract_succeeds() {
    let mut container = container();
    container.register_type::<SqlRepository>().unwrap();
    container.register_type::<Service>().unwrap();

    let first = container.create_instance::<Service>().unwrap();
    let second = container.create_instance::<Service>().unwrap();

    assert!(first.repository.describe().starts_with("sql#"));
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first.clock, &second.clock));
    assert_eq!(
        first.repository.describe(),
        container.create_contract::<dyn Repository>().unwrap().describe()
    );
}

#[test]
fn resolve_contract_registered_late_succeeds() {
    let mut container = container();
    container.register_type::<Service>().unwrap();
    assert!(container.create_instance::<Service>().is_err());

    container.register_type::<SqlRepository>().unwrap();
    assert!(container.create_instance::<Service>().is_ok());
}

#[test]
fn resolve_transient_injection_succeeds() {
    let mut container = container();
    container.register_type::<Ticker>().unwrap();

    let first = container.create_instance::<Ticker>().unwrap();
    let second = container.create_instance::<Ticker>().unwrap();
    assert!(!Arc::ptr_eq(&first.clock, &second.clock));
}

#[test]
fn resolve_singleton_succeeds() {
    let mut container = container();
    container.register_type::<Pool>().unwrap();

    let first = container.create_instance::<Pool>().unwrap();
    let second = container.get_instance::<Pool>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn register_contract_not_satisfied_fails() {
    pub struct Impostor;

    #[injectable]
    impl Impostor {
        #[dependency(alias = dyn Repository)]
        fn new() -> Self {
            Impostor
        }
    }

    impl Repository for Impostor {
        fn describe(&self) -> String {
            String::from("impostor")
        }
    }

    let mut container = container();
    let err = container.register_type::<Impostor>().unwrap_err();
    assert!(matches!(err, RegistrationError::NotAssignable { .. }));
    assert!(err.to_string().contains("is not assignable from"));
}

pub struct Left {
    _right: Arc<Right>,
}

#[injectable]
impl Left {
    #[dependency]
    fn new(right: Arc<Right>) -> Self {
        Left { _right: right }
    }
}

pub struct Right {
    _left: Arc<Left>,
}

#[injectable]
impl Right {
    #[dependency]
    fn new(left: Arc<Left>) -> Self {
        Right { _left: left }
    }
}

#[test]
fn register_circular_reference_fails() {
    let mut container = Container::new();
    container.declare::<Right>();

    let err = container.register_type::<Left>().unwrap_err();
    assert!(matches!(
        err.root_cause(),
        RegistrationError::CircularReference { .. }
    ));
    assert!(container
        .signatures()
        .iter()
        .all(|signature| !signature.as_str().starts_with(std::any::type_name::<Left>())));
}

#[derive(Debug)]
pub struct Missing;

#[derive(Debug)]
pub struct Report {
    missing: Option<Arc<Missing>>,
    title: String,
}

#[injectable]
impl Report {
    #[dependency]
    fn new(missing: Option<Arc<Missing>>, title: String) -> Self {
        Report { missing, title }
    }
}

#[test]
fn get_instance_substitutes_absence() {
    let mut container = Container::new();
    container.register_instance(String::from("quarterly"));
    container.register_type::<Report>().unwrap();

    let report = container.get_instance::<Report>().unwrap();
    assert!(report.missing.is_none());
    assert_eq!(report.title, "quarterly");

    let err = container.create_instance::<Report>().unwrap_err();
    assert!(matches!(
        err,
        InstantiationError::UnresolvedDependency { .. }
    ));
}

#[derive(Debug)]
pub struct InvalidPort(u16);

impl fmt::Display for InvalidPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid port {}", self.0)
    }
}

impl std::error::Error for InvalidPort {}

#[derive(Debug)]
pub struct Listener {
    port: u16,
}

#[injectable]
impl Listener {
    #[dependency]
    fn new(port: u16) -> Result<Self, InvalidPort> {
        if port == 0 {
            Err(InvalidPort(port))
        } else {
            Ok(Listener { port })
        }
    }
}

#[test]
fn create_instance_with_arguments_succeeds() {
    let mut container = Container::new();
    container.register_type::<Listener>().unwrap();

    let port: Object = Arc::new(8080u16);
    let listener = container.create_instance_with::<Listener>(&[port]).unwrap();
    assert_eq!(listener.port, 8080);

    let port: Object = Arc::new(0u16);
    let err = container.create_instance_with::<Listener>(&[port]).unwrap_err();
    assert!(matches!(err, InstantiationError::Activation { .. }));
}

#[test]
fn register_type_with_arguments_binds_them() {
    let mut container = Container::new();
    let port: Object = Arc::new(443u16);
    container.register_type_with::<Listener>(&[port]).unwrap();

    assert_eq!(container.create_instance::<Listener>().unwrap().port, 443);
    assert_eq!(container.get_instance::<Listener>().unwrap().port, 443);
}

pub struct Spawner {
    clocks: Factory<Clock>,
}

#[injectable]
impl Spawner {
    #[dependency]
    fn new(clocks: Factory<Clock>) -> Self {
        Spawner { clocks }
    }
}

#[test]
fn resolve_factory_succeeds() {
    let mut container = Container::new();
    container.register_factory(|| Clock);
    container.register_type::<Spawner>().unwrap();

    let spawner = container.create_instance::<Spawner>().unwrap();
    assert!(!Arc::ptr_eq(&spawner.clocks.get(), &spawner.clocks.get()));
}

#[test]
fn enumerate_runtime_types_succeeds() {
    let mut container = container();
    container.register_type::<SqlRepository>().unwrap();

    let contract = std::any::type_name::<dyn Repository>();
    let owner = std::any::type_name::<SqlRepository>();
    assert!(container
        .runtime_aliased_types()
        .iter()
        .any(|signature| signature.base() == owner));
    assert!(container
        .runtime_type_aliases()
        .iter()
        .any(|signature| signature.base() == contract));
    assert!(container
        .runtime_non_aliased_types()
        .iter()
        .all(|signature| signature.base() != owner));
    assert!(container.runtime_types().len() >= 3);
}
