//! Using `LifecyclePool` for items that are bound to a payload while in use.

use ring_pool::{Attach, LifecyclePool};

/// A reusable request context. The pool keeps the scratch buffer allocated between requests
/// while the request path is attached and detached around each use.
#[derive(Debug, Default)]
struct RequestContext {
    path: Option<String>,
    scratch: Vec<u8>,
}

impl Attach for RequestContext {
    type Payload = String;

    fn attach(&mut self, payload: Option<String>) {
        self.path = payload;
    }

    fn detach(&mut self) {
        self.path = None;
        self.scratch.clear();
    }
}

fn main() {
    let mut pool = LifecyclePool::new(RequestContext::default);

    for path in ["/index.html", "/about.html", "/contact.html"] {
        let mut context = pool.acquire(Some(path.to_string()));

        context.scratch.extend_from_slice(b"rendered page for ");
        context
            .scratch
            .extend_from_slice(context.path.as_deref().unwrap_or_default().as_bytes());

        println!(
            "Handled {} using a scratch buffer with capacity {}",
            context.path.as_deref().unwrap_or_default(),
            context.scratch.capacity()
        );

        pool.release(context);
    }

    println!("Pool stores {} detached contexts", pool.len());
}
