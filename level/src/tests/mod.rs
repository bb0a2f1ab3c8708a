mod bsp_order_tests;
