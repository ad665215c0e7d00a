pub mod branch;
pub mod category;
pub mod dining_table;
pub mod invoice;
pub mod item;
pub mod menu;
pub mod order;
pub mod order_item;
pub mod reservation;
pub mod restaurant;
pub mod staff;
