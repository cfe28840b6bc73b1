use log::debug;

/// A page render request. Only the most recently issued ticket is current.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderTicket {
    pub generation: u64,
    pub page: u32,
    pub scale: f64,
}

/// Issues render tickets so a render that resolves after a newer one was
/// started can be dropped instead of painting a stale page.
#[derive(Default, Debug)]
pub struct RenderGate {
    generation: u64,
}

impl RenderGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, page: u32, scale: f64) -> RenderTicket {
        self.generation += 1;
        RenderTicket {
            generation: self.generation,
            page,
            scale,
        }
    }

    pub fn is_current(&self, ticket: &RenderTicket) -> bool {
        let current = ticket.generation == self.generation;
        if !current {
            debug!(
                "discarding stale render page={} generation={} latest={}",
                ticket.page, ticket.generation, self.generation
            );
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_ticket_is_current() {
        let mut gate = RenderGate::new();
        let first = gate.begin(1, 1.0);
        assert!(gate.is_current(&first));
        let second = gate.begin(2, 1.0);
        assert!(!gate.is_current(&first));
        assert!(gate.is_current(&second));
        assert!(second.generation > first.generation);
    }
}
