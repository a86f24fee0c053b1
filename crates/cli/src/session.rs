use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use stockwatch_events::{EventBus, InMemoryEventBus, Subscription};
use stockwatch_inventory::{
    FulfillmentOutcome, LowStockAlert, Product, ProductId, PublishingObserver, StockChange,
    Warehouse, WarehouseError,
};

use crate::alert_service::AlertService;
use crate::script::{Command, ScriptLine};

type AlertBus = Arc<InMemoryEventBus<LowStockAlert>>;

/// What happened to one script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Added { replaced: Option<Product> },
    Received(StockChange),
    Fulfilled(FulfillmentOutcome),
    Rejected(WarehouseError),
    Shown(usize),
}

/// A warehouse wired to the logging alert service and the alert bus.
///
/// The session owns the strong references to both observers; the warehouse
/// only holds weak ones.
pub struct Session {
    warehouse: Warehouse,
    alert_service: Arc<AlertService>,
    _publisher: Arc<PublishingObserver<AlertBus>>,
    alerts: Subscription<LowStockAlert>,
    published: Vec<LowStockAlert>,
}

#[derive(Debug, Serialize)]
pub struct Summary<'a> {
    pub products: Vec<&'a Product>,
    pub low_stock: Vec<&'a ProductId>,
    pub alerts_logged: usize,
    pub alerts_published: usize,
}

impl Session {
    pub fn new() -> Self {
        let bus: AlertBus = Arc::new(InMemoryEventBus::new());
        let alerts = bus.subscribe();
        let alert_service = Arc::new(AlertService::new());
        let publisher = Arc::new(PublishingObserver::new(bus));

        let mut warehouse = Warehouse::new();
        warehouse.add_observer(&alert_service);
        warehouse.add_observer(&publisher);

        Self {
            warehouse,
            alert_service,
            _publisher: publisher,
            alerts,
            published: Vec::new(),
        }
    }

    /// Apply each line in order. Warehouse errors are recorded per line and
    /// do not stop the run.
    pub fn run(&mut self, lines: &[ScriptLine]) -> Vec<LineOutcome> {
        lines.iter().map(|line| self.apply(line)).collect()
    }

    fn apply(&mut self, line: &ScriptLine) -> LineOutcome {
        let result = match &line.command {
            Command::Add {
                id,
                name,
                quantity,
                reorder_threshold,
            } => {
                let product = Product::new(id.clone(), name.as_str(), *quantity, *reorder_threshold);
                Ok(LineOutcome::Added {
                    replaced: self.warehouse.add_product(product),
                })
            }
            Command::Receive { id, quantity } => self
                .warehouse
                .receive_shipment(id, *quantity)
                .map(LineOutcome::Received),
            Command::Fulfill { id, quantity } => self
                .warehouse
                .fulfill_order(id, *quantity)
                .map(LineOutcome::Fulfilled),
            Command::Show => {
                for product in self.warehouse.products() {
                    info!(
                        product_id = %product.id(),
                        name = %product.name(),
                        quantity = product.quantity(),
                        reorder_threshold = product.reorder_threshold(),
                        low_stock = product.is_low_stock(),
                        "Stock level"
                    );
                }
                info!(
                    products = self.warehouse.len(),
                    low_stock = self.warehouse.low_stock_products().len(),
                    "Stock overview"
                );
                Ok(LineOutcome::Shown(self.warehouse.len()))
            }
        };

        result.unwrap_or_else(|e| {
            warn!(
                line = line.line,
                product_id = %e.product_id(),
                error = %e,
                "Command rejected"
            );
            LineOutcome::Rejected(e)
        })
    }

    pub fn warehouse(&self) -> &Warehouse {
        &self.warehouse
    }

    pub fn alerts_logged(&self) -> usize {
        self.alert_service.alert_count()
    }

    /// Every alert published on the bus so far, oldest first.
    pub fn published_alerts(&mut self) -> &[LowStockAlert] {
        for alert in self.alerts.drain() {
            info!(
                product_id = %alert.product_id,
                quantity = alert.quantity,
                shortfall = alert.shortfall(),
                "Low-stock alert published"
            );
            self.published.push(alert);
        }
        &self.published
    }

    /// Collect outstanding alerts and report the final inventory.
    pub fn finish(&mut self) -> Summary<'_> {
        let alerts_published = self.published_alerts().len();
        Summary {
            products: self.warehouse.products(),
            low_stock: self
                .warehouse
                .low_stock_products()
                .into_iter()
                .map(|p| p.id())
                .collect(),
            alerts_logged: self.alerts_logged(),
            alerts_published,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::parse_script;

    #[test]
    fn demo_script_raises_one_alert_on_both_observers() {
        let mut session = Session::new();
        let lines = parse_script(crate::DEMO_SCRIPT).unwrap();

        let outcomes = session.run(&lines);

        assert_eq!(outcomes.len(), 3);
        match &outcomes[2] {
            LineOutcome::Fulfilled(outcome) => {
                assert_eq!(outcome.change.quantity, 4);
                assert_eq!(outcome.observers_notified, 2);
            }
            other => panic!("Expected Fulfilled, got {other:?}"),
        }
        assert_eq!(session.alerts_logged(), 1);

        let published = session.published_alerts();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].product_id, ProductId::new("P001"));
        assert_eq!(published[0].quantity, 4);
    }

    #[test]
    fn rejected_lines_do_not_stop_the_run() {
        let mut session = Session::new();
        let lines = parse_script("receive P404 1\nadd P1 Cable 2 1\nfulfill P1 3\nfulfill P1 2").unwrap();

        let outcomes = session.run(&lines);

        assert_eq!(
            outcomes[0],
            LineOutcome::Rejected(WarehouseError::ProductNotFound(ProductId::new("P404")))
        );
        assert!(matches!(
            outcomes[2],
            LineOutcome::Rejected(WarehouseError::InsufficientStock { .. })
        ));
        assert!(matches!(outcomes[3], LineOutcome::Fulfilled(_)));
        assert_eq!(session.warehouse().product(&ProductId::new("P1")).unwrap().quantity(), 0);
        assert_eq!(session.alerts_logged(), 1);
    }

    #[test]
    fn finish_serializes_inventory() {
        let mut session = Session::new();
        session.run(&parse_script(crate::DEMO_SCRIPT).unwrap());

        let json = serde_json::to_value(session.finish()).unwrap();

        assert_eq!(json["products"][0]["id"], "P001");
        assert_eq!(json["products"][0]["quantity"], 4);
        assert_eq!(json["low_stock"][0], "P001");
        assert_eq!(json["alerts_logged"], 1);
        assert_eq!(json["alerts_published"], 1);
    }

    #[test]
    fn finish_keeps_alert_count_across_calls() {
        let mut session = Session::new();
        session.run(&parse_script(crate::DEMO_SCRIPT).unwrap());

        assert_eq!(session.published_alerts().len(), 1);
        assert_eq!(session.finish().alerts_published, 1);
        assert_eq!(session.finish().alerts_published, 1);

        session.run(&parse_script("fulfill P001 1").unwrap());
        assert_eq!(session.finish().alerts_published, 2);
    }
}
