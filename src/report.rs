//! Structured reporting of experimental results.
//!
//! RAII guards push nested contexts which mirror the call graph, values are
//! reported into the innermost context, and the whole document is emitted as
//! one JSON object on stdout when the outermost guard is dropped.
//! Human-readable progress goes to stderr, the machine-readable run record to
//! stdout, so both can be captured independently.

use crate::built_info;
use serde_json::{Map, Value};
use std::{cell::RefCell, mem::swap};

pub use serde_json::json;

#[derive(Debug)]
enum StackItem {
    Key(String),
    Collection(Vec<Value>),
    Object(Map<String, Value>),
}

#[derive(Debug)]
enum Current {
    Collection(Vec<Value>),
    Object(Map<String, Value>),
}

#[derive(Debug)]
pub struct Reporter {
    current: Current,
    stack: Vec<StackItem>,
}

impl Default for Reporter {
    fn default() -> Self {
        Reporter {
            current: Current::Object(Map::new()),
            stack: Vec::new(),
        }
    }
}

impl Reporter {
    fn create_object_under_key(&mut self, key: String) {
        match &mut self.current {
            Current::Object(object) => {
                let mut tmp = Map::new();
                swap(&mut tmp, object);
                self.stack.push(StackItem::Object(tmp));
                self.stack.push(StackItem::Key(key));
            }
            Current::Collection(_) => panic!("cannot create object at key in collection"),
        }
    }

    fn create_collection_under_key(&mut self, key: String) {
        match &mut self.current {
            Current::Object(object) => {
                let mut tmp = Map::new();
                swap(&mut tmp, object);
                self.stack.push(StackItem::Object(tmp));
                self.stack.push(StackItem::Key(key));
                self.current = Current::Collection(Vec::new());
            }
            Current::Collection(_) => panic!("cannot create collection at key in collection"),
        }
    }

    fn create_collection_item(&mut self) {
        match &mut self.current {
            Current::Object(_) => panic!("cannot create collection item in object"),
            Current::Collection(collection) => {
                let mut tmp = Vec::new();
                swap(&mut tmp, collection);
                self.stack.push(StackItem::Collection(tmp));
                self.current = Current::Object(Map::new());
            }
        }
    }

    fn report(&mut self, key: String, val: Value) {
        match &mut self.current {
            Current::Object(object) => {
                object.insert(key, val);
            }
            Current::Collection(_) => panic!("cannot report value on collection"),
        }
    }

    fn pop_context(&mut self) {
        match self.stack.pop().expect("tried to pop from empty context") {
            StackItem::Key(key) => {
                let parent = self.stack.pop().expect("tried to pop from empty context");

                if let StackItem::Object(mut object) = parent {
                    let mut prev = Current::Object(Default::default());
                    swap(&mut self.current, &mut prev);

                    match prev {
                        Current::Object(cur) => object.insert(key, Value::Object(cur)),
                        Current::Collection(cur) => object.insert(key, Value::Array(cur)),
                    };

                    self.current = Current::Object(object);
                } else {
                    panic!("inconsistent context stack");
                }
            }
            StackItem::Collection(mut collection) => {
                let mut prev = Current::Object(Default::default());
                swap(&mut self.current, &mut prev);

                match prev {
                    Current::Object(cur) => collection.push(Value::Object(cur)),
                    Current::Collection(_) => panic!("cannot insert collection into collection"),
                };

                self.current = Current::Collection(collection);
            }
            StackItem::Object(_) => panic!("inconsistent context stack"),
        }
    }
}

thread_local! {
    static REPORTER: RefCell<Option<Reporter>> = RefCell::new(None);
}

#[must_use]
pub struct ContextGuard(());

impl Drop for ContextGuard {
    fn drop(&mut self) {
        REPORTER.with(|reporter| reporter.borrow_mut().as_mut().map(Reporter::pop_context));
    }
}

pub fn push_context(key: String) -> ContextGuard {
    REPORTER.with(|reporter| reporter.borrow_mut().as_mut().map(|r| r.create_object_under_key(key)));
    ContextGuard(())
}

#[must_use]
pub struct CollectionContextGuard(());

impl Drop for CollectionContextGuard {
    fn drop(&mut self) {
        REPORTER.with(|reporter| reporter.borrow_mut().as_mut().map(Reporter::pop_context));
    }
}

pub fn push_collection_context(key: String) -> CollectionContextGuard {
    REPORTER.with(|reporter| reporter.borrow_mut().as_mut().map(|r| r.create_collection_under_key(key)));
    CollectionContextGuard(())
}

impl CollectionContextGuard {
    pub fn push_collection_item(&mut self) -> CollectionItemContextGuard {
        REPORTER.with(|reporter| reporter.borrow_mut().as_mut().map(Reporter::create_collection_item));
        CollectionItemContextGuard(self)
    }
}

#[must_use]
pub struct CollectionItemContextGuard<'a>(&'a CollectionContextGuard);

impl<'a> Drop for CollectionItemContextGuard<'a> {
    fn drop(&mut self) {
        REPORTER.with(|reporter| reporter.borrow_mut().as_mut().map(Reporter::pop_context));
    }
}

pub fn report(key: String, val: Value) {
    if cfg!(feature = "report-to-stderr") {
        eprintln!("{}: {}", key, val);
    }
    REPORTER.with(|reporter| reporter.borrow_mut().as_mut().map(|r| r.report(key, val)));
}

#[must_use]
pub struct ReportingGuard(());

impl Drop for ReportingGuard {
    fn drop(&mut self) {
        REPORTER.with(|reporter| {
            if let Some(r) = reporter.borrow_mut().as_mut() {
                assert!(r.stack.is_empty());
                let mut current = Current::Object(Default::default());
                swap(&mut current, &mut r.current);
                if let Current::Object(object) = current {
                    println!("{}", Value::Object(object));
                } else {
                    panic!("broken root object for reporting");
                }
            };
        });
    }
}

#[macro_export]
macro_rules! report {
    ($k:expr, $($json:tt)+) => { report($k.to_string(), json!($($json)+)) };
}

pub fn enable_reporting(program: &str) -> ReportingGuard {
    REPORTER.with(|reporter| reporter.replace(Some(Reporter::default())));

    report!("build_target", built_info::TARGET);
    report!("build_profile", built_info::PROFILE);
    report!("build_with_rustc", built_info::RUSTC_VERSION);

    if let Ok(hostname) = std::process::Command::new("hostname").output() {
        report!("hostname", String::from_utf8(hostname.stdout).unwrap().trim());
    }

    report!("program", program);
    report!("start_time", format!("{}", time::now_utc().rfc822()));
    report!("args", std::env::args().collect::<Vec<String>>());

    ReportingGuard(())
}

pub mod benchmark;
pub use benchmark::*;
