pub mod sidenav;
