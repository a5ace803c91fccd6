mod board_tests;
