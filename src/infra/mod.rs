pub mod pretalx;
