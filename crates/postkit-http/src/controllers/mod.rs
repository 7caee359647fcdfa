pub mod post_controller;
