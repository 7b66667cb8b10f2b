pub mod metadata_list_tests;
