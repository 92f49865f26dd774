pub mod image_input;
