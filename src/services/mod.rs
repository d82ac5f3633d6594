pub mod navigation;
pub mod selection;
pub mod ticket_card;
pub mod ticket_image;
