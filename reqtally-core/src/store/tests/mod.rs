mod time_keyed_tests;
