mod concurrent_forecast;
