use super::answer::{Answer, AskMode, Asked, Resolver, SafeAsked};

/// Question state owned by a single widget.
///
/// Same answer contract as [`AskStore`](super::AskStore), without a payload,
/// a key or subscribers: the owning widget reads [`asking`](Self::asking)
/// when it renders.
#[derive(Debug)]
pub struct LocalAsk<D = (), R = ()> {
    resolver: Option<Resolver<D, R>>,
}

impl<D, R> Default for LocalAsk<D, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, R> LocalAsk<D, R> {
    pub fn new() -> Self {
        Self { resolver: None }
    }

    /// Ask in throwing mode. An unanswered earlier question is abandoned.
    pub fn ask(&mut self) -> Asked<D, R> {
        let (resolver, rx) = Resolver::channel(AskMode::Throwing);
        self.resolver = Some(resolver);
        Asked::new(rx)
    }

    /// Ask in safe mode. An unanswered earlier question is abandoned.
    pub fn safe_ask(&mut self) -> SafeAsked<D, R> {
        let (resolver, rx) = Resolver::channel(AskMode::Safe);
        self.resolver = Some(resolver);
        SafeAsked::new(rx)
    }

    pub fn asking(&self) -> bool {
        self.resolver.is_some()
    }

    pub fn ok(&mut self, data: D) -> bool {
        self.settle(Answer::Ok(data))
    }

    pub fn cancel(&mut self) -> bool {
        self.settle(Answer::Cancelled(None))
    }

    pub fn cancel_with(&mut self, reason: R) -> bool {
        self.settle(Answer::Cancelled(Some(reason)))
    }

    fn settle(&mut self, answer: Answer<D, R>) -> bool {
        match self.resolver.take() {
            Some(resolver) => {
                resolver.settle(answer);
                true
            }
            None => false,
        }
    }
}
