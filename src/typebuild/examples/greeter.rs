use std::sync::Arc;

use typebuild::prelude::*;

fn main() {
    let mut container = Container::new();
    container.register_instance(AppName("greeter"));
    container.declare_contract::<dyn Logger>();
    container.declare_contract::<dyn Greeter>();

    container.register_type::<ConsoleLogger>().unwrap();
    container.register_type::<EnglishGreeter>().unwrap();
    container.register_type::<App>().unwrap();

    let app = container.create_instance::<App>().unwrap();
    app.run();

    for signature in container.signatures() {
        app.logger.log(&format!("registered {signature}"));
    }
}

struct AppName(&'static str);

trait Logger: Send + Sync + 'static {
    fn log(&self, message: &str);
}

struct ConsoleLogger {
    app_name: Arc<AppName>,
}

#[injectable(satisfies(dyn Logger))]
impl ConsoleLogger {
    #[dependency(singleton, alias = dyn Logger)]
    fn new(app_name: Arc<AppName>) -> Self {
        Self { app_name }
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, message: &str) {
        eprintln!("[{}] {}", self.app_name.0, message);
    }
}

trait Greeter: Send + Sync + 'static {
    fn greet(&self);
}

struct EnglishGreeter {
    logger: Contract<dyn Logger>,
}

#[injectable(satisfies(dyn Greeter))]
impl EnglishGreeter {
    #[dependency(alias = dyn Greeter)]
    fn new(logger: Contract<dyn Logger>) -> Self {
        Self { logger }
    }
}

impl Greeter for EnglishGreeter {
    fn greet(&self) {
        self.logger.log("Hello World!");
    }
}

struct App {
    logger: Contract<dyn Logger>,
    greeter: Contract<dyn Greeter>,
}

#[injectable]
impl App {
    #[dependency]
    fn new(logger: Contract<dyn Logger>, greeter: Contract<dyn Greeter>) -> Self {
        Self { logger, greeter }
    }

    fn run(&self) {
        self.logger.log("Greeting from typebuild managed objects:");
        self.greeter.greet();
    }
}
