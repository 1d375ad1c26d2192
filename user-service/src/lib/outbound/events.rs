pub mod consumer;
pub mod messages;
pub mod producer;

pub use consumer::ConfirmationConsumer;
pub use producer::KafkaEventProducer;
