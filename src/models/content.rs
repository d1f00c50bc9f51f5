use crate::db::Collection;

/// Read-only site content collections, served as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Carousel,
    Feature,
    Service,
    Testimonial,
}

impl ContentKind {
    pub fn collection(&self) -> Collection {
        match self {
            ContentKind::Carousel => Collection::Carousel,
            ContentKind::Feature => Collection::Features,
            ContentKind::Service => Collection::Services,
            ContentKind::Testimonial => Collection::Testimonials,
        }
    }
}
