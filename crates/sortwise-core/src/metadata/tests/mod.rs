pub mod entry_tests;
