use super::ResponseHandler;
use crate::models::{Event, EventFilter};
use crate::response::Envelope;

impl ResponseHandler<Event> {
    pub async fn get_by_filter(&self, filter: &EventFilter) -> Envelope {
        let result = self.query().get_by_filter(filter).await;
        self.list(result, self.messages().get_all_success(), self.messages().get_all_error())
    }

    pub async fn get_by_categories(&self, categories: &[i64]) -> Envelope {
        let result = self.query().get_by_categories(categories).await;
        self.list(result, self.messages().by_category_success(), self.messages().get_all_error())
    }

    pub async fn get_by_category(&self, category_id: i64) -> Envelope {
        let result = self.query().get_by_category(category_id).await;
        self.list(result, self.messages().by_category_success(), self.messages().get_all_error())
    }
}
